//! Course list scraping from the enrollment query module.

use serde::Deserialize;

use crate::parse::{merge_teacher_names, parse_decimal_or_zero, parse_items};
use crate::session::{AcademicSession, ACCEPT_JSON, FORM_CONTENT_TYPE};
use crate::term::Period;
use crate::types::{Course, PortalResult};

/// One row of the enrollment query response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CourseItem {
    /// Course number.
    kch: String,
    /// Course name.
    kcmc: String,
    /// Instructors, `id/name/title` joined by commas.
    jsxx: String,
    xnm: String,
    xqmc: String,
    /// Offering school.
    kkxymc: String,
    jxbmc: String,
    /// Course property.
    kcxzmc: String,
    /// Credit.
    xf: String,
}

impl From<CourseItem> for Course {
    fn from(item: CourseItem) -> Self {
        Course {
            course_id: item.kch,
            name: item.kcmc,
            teacher: merge_teacher_names(&item.jsxx),
            class: item.jxbmc,
            school: item.kkxymc,
            property: item.kcxzmc,
            credit: parse_decimal_or_zero(&item.xf),
            year: item.xnm,
            term: item.xqmc,
        }
    }
}

/// The paging and filter fields shared by the list queries.
pub(crate) fn list_query_form(period: &Period, nonce: String) -> Vec<(&'static str, String)> {
    vec![
        ("xnm", period.year().to_string()),
        ("xqm", period.term_code().to_string()),
        ("_search", "false".to_string()),
        ("nd", nonce),
        ("queryModel.showCount", "1000".to_string()),
        ("queryModel.currentPage", "1".to_string()),
        ("queryModel.sortName", String::new()),
        ("queryModel.sortOrder", "asc".to_string()),
        ("time", "5".to_string()),
    ]
}

/// Fetch the student's enrolled courses for a period.
///
/// The session must already have passed the academic-system SSO exchange.
pub async fn fetch_courses(
    session: &AcademicSession,
    period: &Period,
) -> PortalResult<Vec<Course>> {
    let config = session.config();
    let url = config.course_query_url(session.student_id())?;
    let form = list_query_form(period, crate::session::nonce());
    let headers = [
        ("Content-Type", FORM_CONTENT_TYPE.to_string()),
        ("Origin", config.xk_origin()),
        ("Accept", ACCEPT_JSON.to_string()),
    ];

    let body = session.query(&url, &form, &headers).await?;
    let items: Vec<CourseItem> = parse_items(&body)?;
    tracing::debug!("Enrollment query returned {} courses", items.len());

    Ok(items.into_iter().map(Course::from).collect())
}
