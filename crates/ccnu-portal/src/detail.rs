//! Per-course grade breakdown and its aggregation into the summary list.

use serde::Deserialize;

use crate::grade::{fetch_grades, ACCEPT_LANGUAGE};
use crate::parse::{parse_decimal_or_zero, parse_items};
use crate::session::{AcademicSession, ACCEPT_JSON, FORM_CONTENT_TYPE};
use crate::term::{term_code, Period};
use crate::types::{Grade, PortalResult};

/// One labelled score of a breakdown, e.g. regular 30% / final 70% / total.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BreakdownItem {
    /// Item label with its weight.
    pub xmblmc: String,
    /// Item score.
    pub xmcj: String,
}

/// Fetch the score breakdown of one class section.
pub async fn fetch_breakdown(
    session: &AcademicSession,
    year: &str,
    term: &str,
    class_section_id: &str,
) -> PortalResult<Vec<BreakdownItem>> {
    let config = session.config();
    let form = [
        ("xnm", year.to_string()),
        ("xqm", term_code(term).to_string()),
        ("jxb_id", class_section_id.to_string()),
        ("_search", "false".to_string()),
        ("nd", crate::session::nonce()),
        ("queryModel.showCount", "1000".to_string()),
        ("queryModel.currentPage", "1".to_string()),
        ("queryModel.sortName", "xmblmc".to_string()),
        ("queryModel.sortOrder", "asc".to_string()),
        ("time", "3".to_string()),
    ];
    let headers = [
        ("Content-Type", FORM_CONTENT_TYPE.to_string()),
        ("Accept", ACCEPT_JSON.to_string()),
        ("Accept-Language", ACCEPT_LANGUAGE.to_string()),
        ("Origin", config.xk_origin()),
        ("Referer", config.grade_detail_referer()),
        ("Sec-Fetch-Dest", "empty".to_string()),
        ("Sec-Fetch-Mode", "cors".to_string()),
        ("Sec-Fetch-Site", "same-origin".to_string()),
        ("X-Requested-With", "XMLHttpRequest".to_string()),
    ];

    let body = session.query(&config.grade_detail_url(), &form, &headers).await?;
    parse_items(&body)
}

/// Merge a breakdown into its summary grade.
///
/// Three items are regular, final and total in that order. Any other count
/// (courses graded on a single aggregate return one item) leaves the known
/// total in place and copies it into regular and final.
pub fn apply_breakdown(grade: &mut Grade, items: &[BreakdownItem]) {
    if let [regular, final_score, total] = items {
        grade.regular = parse_decimal_or_zero(&regular.xmcj);
        grade.final_score = parse_decimal_or_zero(&final_score.xmcj);
        grade.total = parse_decimal_or_zero(&total.xmcj);
    } else {
        tracing::debug!(
            "Breakdown for section {} has {} items, using total for every component",
            grade.class_section_id,
            items.len()
        );
        grade.regular = grade.total;
        grade.final_score = grade.total;
    }
}

/// Fetch the grade summary and fill in every row's breakdown.
///
/// Consumes the session: all requests run on it, and it is dropped when the
/// aggregation finishes or fails. The first error aborts with no partial result.
pub async fn fetch_detailed(session: AcademicSession, period: &Period) -> PortalResult<Vec<Grade>> {
    let mut grades = fetch_grades(&session, period).await?;
    tracing::debug!("Summary fetched, {} breakdowns to load", grades.len());

    for grade in grades.iter_mut() {
        let items = fetch_breakdown(&session, &grade.year, &grade.term, &grade.class_section_id)
            .await?;
        apply_breakdown(grade, &items);
    }

    Ok(grades)
}
