//! CAS login handshake.
//!
//! 1. GET the login page and harvest its hidden form tokens.
//! 2. POST the credential form to the session-qualified login URL.
//! 3. Success iff that response sets a cookie.
//! 4. Optionally GET CAS again with `service=<sso url>` so the academic
//!    system trades the ticket for its own session cookie.

use std::sync::Arc;

use scraper::{Html, Selector};

use crate::config::PortalConfig;
use crate::session::AcademicSession;
use crate::types::{Credential, PortalError, PortalResult};

/// Single-use tokens from the CAS login page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreflightTokens {
    pub lt: String,
    pub execution: String,
    pub event_id: String,
    pub submit: String,
    pub jsessionid: Option<String>,
}

impl PreflightTokens {
    /// Extract tokens from the login page HTML.
    ///
    /// `lt` and `execution` are mandatory. The JSESSIONID is taken from the
    /// form's `action` (`/cas/login;jsessionid=...`) when present; callers
    /// prefer the cookie value over it.
    pub fn from_html(html: &str) -> PortalResult<Self> {
        let doc = Html::parse_document(html);

        let lt = input_value(&doc, "lt")
            .ok_or_else(|| PortalError::ParseFailure("login page has no 'lt' token".to_string()))?;
        let execution = input_value(&doc, "execution").ok_or_else(|| {
            PortalError::ParseFailure("login page has no 'execution' token".to_string())
        })?;

        Ok(Self {
            lt,
            execution,
            event_id: input_value(&doc, "_eventId").unwrap_or_default(),
            submit: input_value(&doc, "submit").unwrap_or_default(),
            jsessionid: form_jsessionid(&doc),
        })
    }
}

fn input_value(doc: &Html, name: &str) -> Option<String> {
    let sel = Selector::parse(&format!("input[name=\"{name}\"]")).ok()?;
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(|v| v.to_string())
}

fn form_jsessionid(doc: &Html) -> Option<String> {
    let sel = Selector::parse("form[action]").ok()?;
    doc.select(&sel)
        .filter_map(|el| el.value().attr("action"))
        .find_map(jsessionid_from_path)
}

fn jsessionid_from_path(action: &str) -> Option<String> {
    let (_, rest) = action.split_once(";jsessionid=")?;
    let id = rest.split(['?', '#', ';']).next().unwrap_or_default();
    (!id.is_empty()).then(|| id.to_string())
}

/// Performs the CAS login handshake and hands out authenticated sessions.
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    config: Arc<PortalConfig>,
}

impl SessionAuthenticator {
    pub fn new(config: Arc<PortalConfig>) -> Self {
        Self { config }
    }

    /// Log in with one credential pair.
    ///
    /// A response without `Set-Cookie` is [`PortalError::InvalidCredential`];
    /// transport failures are [`PortalError::NetworkFailure`].
    pub async fn login(&self, credential: &Credential) -> PortalResult<AcademicSession> {
        let session = AcademicSession::new(&credential.student_id, self.config.clone())?;
        let tokens = self.preflight(&session).await?;

        let login_url = match &tokens.jsessionid {
            Some(id) => format!("{};jsessionid={id}", self.config.login_url()),
            None => {
                tracing::debug!("No JSESSIONID on the login page, posting to the bare login URL");
                self.config.login_url()
            }
        };

        let form = [
            ("username", credential.student_id.clone()),
            ("password", credential.password.clone()),
            ("lt", tokens.lt),
            ("execution", tokens.execution),
            ("_eventId", tokens.event_id),
            ("submit", tokens.submit),
        ];
        let headers = [(
            "Content-Type",
            "application/x-www-form-urlencoded".to_string(),
        )];

        let resp = session
            .post_form(&login_url, &form, &headers, self.config.auth_timeout)
            .await?;

        if !resp.headers().contains_key(reqwest::header::SET_COOKIE) {
            tracing::info!("CAS issued no session cookie, rejecting credentials");
            return Err(PortalError::InvalidCredential);
        }

        tracing::info!("CAS login succeeded");
        Ok(session)
    }

    /// Log in, then enter the academic system through its SSO endpoint.
    pub async fn login_academic(&self, credential: &Credential) -> PortalResult<AcademicSession> {
        let session = self.login(credential).await?;
        self.exchange_ticket(&session).await?;
        Ok(session)
    }

    /// Trade the CAS ticket for an academic-system session cookie.
    pub async fn exchange_ticket(&self, session: &AcademicSession) -> PortalResult<()> {
        let service = self.config.sso_service_url();
        let url = url::Url::parse_with_params(&self.config.login_url(), &[("service", &service)])
            .map_err(|e| PortalError::InvalidInput(format!("bad CAS URL: {e}")))?;

        let resp = session.get(url.as_str(), self.config.auth_timeout).await?;
        tracing::debug!("SSO exchange landed on {}", resp.url());
        Ok(())
    }

    async fn preflight(&self, session: &AcademicSession) -> PortalResult<PreflightTokens> {
        let resp = session
            .get(&self.config.login_url(), self.config.auth_timeout)
            .await?;

        let cookie_id = resp
            .cookies()
            .find(|c| c.name() == "JSESSIONID")
            .map(|c| c.value().to_string());

        let body = resp.text().await?;
        let mut tokens = PreflightTokens::from_html(&body)?;
        if cookie_id.is_some() {
            tokens.jsessionid = cookie_id;
        }
        Ok(tokens)
    }
}
