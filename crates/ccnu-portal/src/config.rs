//! Portal endpoints and timeouts.

use std::time::Duration;

use crate::types::{PortalError, PortalResult};

/// Timeout for each CAS login request.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for each scrape request. The query modules answer noticeably
/// slower than CAS; kept longer than [`AUTH_TIMEOUT`].
pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_CAS_URL: &str = "https://account.ccnu.edu.cn";
pub const DEFAULT_XK_URL: &str = "http://xk.ccnu.edu.cn";

const LOGIN_PATH: &str = "/cas/login";
const SSO_PATH: &str = "/sso/pziotlogin";
const COURSE_QUERY_PATH: &str = "/jwglxt/xkcx/xkmdcx_cxXkmdcxIndex.html";
const GRADE_QUERY_PATH: &str = "/jwglxt/cjcx/cjcx_cxXsgrcj.html";
const GRADE_DETAIL_PATH: &str = "/jwglxt/cjcx/cjcx_cxXsXmcjList.html";
const GRADE_PAGE_PATH: &str = "/jwglxt/cjcx/cjcx_cxDgXscj.html";
const GRADE_DETAIL_PAGE_PATH: &str = "/jwglxt/cjcx/cjcx_cxDgXsxmcj.html";

/// Function-module codes (`gnmkdm`) of the academic system.
pub const COURSE_MODULE: &str = "N255010";
pub const GRADE_MODULE: &str = "N305005";
pub const GRADE_DETAIL_MODULE: &str = "N305007";

/// Where the portal lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    /// Base URL of the CAS single-sign-on server.
    pub cas_url: String,
    /// Base URL of the academic system (course enrollment and grades).
    pub xk_url: String,
    pub auth_timeout: Duration,
    pub scrape_timeout: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            cas_url: DEFAULT_CAS_URL.to_string(),
            xk_url: DEFAULT_XK_URL.to_string(),
            auth_timeout: AUTH_TIMEOUT,
            scrape_timeout: SCRAPE_TIMEOUT,
        }
    }
}

impl PortalConfig {
    /// Point both sub-systems at one base URL. Mainly useful against a mock portal.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            cas_url: base.clone(),
            xk_url: base,
            ..Self::default()
        }
    }

    fn cas(&self) -> &str {
        self.cas_url.trim_end_matches('/')
    }

    fn xk(&self) -> &str {
        self.xk_url.trim_end_matches('/')
    }

    pub fn login_url(&self) -> String {
        format!("{}{LOGIN_PATH}", self.cas())
    }

    /// The academic system's SSO entry, passed to CAS as `service`.
    pub fn sso_service_url(&self) -> String {
        format!("{}{SSO_PATH}", self.xk())
    }

    pub fn xk_origin(&self) -> String {
        self.xk().to_string()
    }

    /// Enrollment query URL; `student_id` is query-encoded.
    pub fn course_query_url(&self, student_id: &str) -> PortalResult<String> {
        let base = format!("{}{COURSE_QUERY_PATH}", self.xk());
        let url = url::Url::parse_with_params(
            &base,
            &[
                ("doType", "query"),
                ("gnmkdm", COURSE_MODULE),
                ("su", student_id),
            ],
        )
        .map_err(|e| PortalError::InvalidInput(format!("bad academic system URL: {e}")))?;
        Ok(url.into())
    }

    pub fn grade_query_url(&self) -> String {
        format!(
            "{}{GRADE_QUERY_PATH}?doType=query&gnmkdm={GRADE_MODULE}",
            self.xk()
        )
    }

    pub fn grade_referer(&self) -> String {
        format!(
            "{}{GRADE_PAGE_PATH}?gnmkdm={GRADE_MODULE}&layout=default",
            self.xk()
        )
    }

    pub fn grade_detail_url(&self) -> String {
        format!("{}{GRADE_DETAIL_PATH}?gnmkdm={GRADE_DETAIL_MODULE}", self.xk())
    }

    pub fn grade_detail_referer(&self) -> String {
        format!(
            "{}{GRADE_DETAIL_PAGE_PATH}?gnmkdm={GRADE_DETAIL_MODULE}&layout=default",
            self.xk()
        )
    }
}
