//! Cookie-bound HTTP session for one portal operation.
//!
//! An [`AcademicSession`] is created by the authenticator, threaded by
//! reference through every scrape of one operation, and dropped at the end.
//! It is not `Clone`: two operations never share a cookie jar.

use std::sync::Arc;
use std::time::Duration;

use crate::config::PortalConfig;
use crate::types::{PortalError, PortalResult};

/// Browser user-agent sent with every request; the portal rejects bare clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0";

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";
pub(crate) const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";

const MAX_REDIRECTS: usize = 10;

/// An HTTP client with a populated cookie jar, owned by one call chain.
#[derive(Debug)]
pub struct AcademicSession {
    client: reqwest::Client,
    student_id: String,
    config: Arc<PortalConfig>,
}

impl AcademicSession {
    /// Create an unauthenticated session with an empty cookie jar.
    pub(crate) fn new(student_id: &str, config: Arc<PortalConfig>) -> PortalResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .timeout(config.scrape_timeout)
            .build()
            .map_err(|e| PortalError::NetworkFailure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            student_id: student_id.to_string(),
            config,
        })
    }

    /// The student this session was issued for.
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// GET a page, following redirects.
    pub(crate) async fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> PortalResult<reqwest::Response> {
        tracing::debug!("GET {url}");
        let resp = self.client.get(url).timeout(timeout).send().await?;
        check_status(resp)
    }

    /// POST url-encoded form fields. Headers are applied before the body so an
    /// explicit `Content-Type` wins over the form default.
    pub(crate) async fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
        headers: &[(&str, String)],
        timeout: Duration,
    ) -> PortalResult<reqwest::Response> {
        tracing::debug!("POST {url} ({} fields)", form.len());
        let mut builder = self.client.post(url).timeout(timeout);
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        let resp = builder.form(form).send().await?;
        check_status(resp)
    }

    /// POST a query form with the scrape timeout and return the body text.
    pub(crate) async fn query(
        &self,
        url: &str,
        form: &[(&str, String)],
        headers: &[(&str, String)],
    ) -> PortalResult<String> {
        let resp = self
            .post_form(url, form, headers, self.config.scrape_timeout)
            .await?;
        Ok(resp.text().await?)
    }
}

/// Server errors are transient; anything else is left for the body parser to judge.
fn check_status(resp: reqwest::Response) -> PortalResult<reqwest::Response> {
    let status = resp.status();
    if status.is_server_error() {
        return Err(PortalError::NetworkFailure(format!(
            "portal returned HTTP {} for {}",
            status.as_u16(),
            resp.url()
        )));
    }
    Ok(resp)
}

/// The freshness nonce (`nd`) the portal's own pages send with each query.
pub(crate) fn nonce() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
