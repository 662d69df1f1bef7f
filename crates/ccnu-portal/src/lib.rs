//! ccnu-portal: CAS login and session-scoped scraping for the CCNU academic portal.

pub mod auth;
pub mod config;
pub mod course;
pub mod detail;
pub mod grade;
pub mod parse;
pub mod portal;
pub mod session;
pub mod term;
pub mod types;

pub use auth::{PreflightTokens, SessionAuthenticator};
pub use config::{PortalConfig, AUTH_TIMEOUT, SCRAPE_TIMEOUT};
pub use course::fetch_courses;
pub use detail::{apply_breakdown, fetch_breakdown, fetch_detailed, BreakdownItem};
pub use grade::fetch_grades;
pub use parse::{merge_teacher_names, parse_decimal_or_zero};
pub use portal::AcademicPortal;
pub use session::AcademicSession;
pub use term::{term_code, Period, Term};
pub use types::*;
