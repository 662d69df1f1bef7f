//! Grade summary scraping from the grade query module.
//!
//! The summary only carries the total score. Each row also carries its
//! class-section id, which [`crate::detail`] uses to fetch the breakdown.

use serde::Deserialize;

use crate::course::list_query_form;
use crate::parse::{parse_decimal_or_zero, parse_items};
use crate::session::{AcademicSession, ACCEPT_JSON, FORM_CONTENT_TYPE};
use crate::term::Period;
use crate::types::{Course, Grade, PortalResult};

pub(crate) const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6";

/// One row of the grade query response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GradeItem {
    /// Instructor names.
    jsxm: String,
    kch: String,
    kcmc: String,
    kcxzmc: String,
    /// Offering school.
    kkbmmc: String,
    xf: String,
    /// Total score.
    cj: String,
    jxb_id: String,
    jxbmc: String,
    xnm: String,
    xqmmc: String,
}

impl From<GradeItem> for Grade {
    fn from(item: GradeItem) -> Self {
        Grade {
            course: Course {
                course_id: item.kch,
                name: item.kcmc,
                teacher: item.jsxm,
                class: item.jxbmc,
                school: item.kkbmmc,
                property: item.kcxzmc,
                credit: parse_decimal_or_zero(&item.xf),
                year: String::new(),
                term: String::new(),
            },
            regular: 0.0,
            final_score: 0.0,
            total: parse_decimal_or_zero(&item.cj),
            year: item.xnm,
            term: item.xqmmc,
            class_section_id: item.jxb_id,
        }
    }
}

/// Fetch the flat grade list (totals only) for a period.
pub async fn fetch_grades(session: &AcademicSession, period: &Period) -> PortalResult<Vec<Grade>> {
    let config = session.config();
    let mut form = list_query_form(period, crate::session::nonce());
    form.insert(2, ("kcbj", String::new()));

    let headers = [
        ("Content-Type", FORM_CONTENT_TYPE.to_string()),
        ("Accept", ACCEPT_JSON.to_string()),
        ("Accept-Language", ACCEPT_LANGUAGE.to_string()),
        ("Referer", config.grade_referer()),
        ("Origin", config.xk_origin()),
        ("X-Requested-With", "XMLHttpRequest".to_string()),
    ];

    let body = session.query(&config.grade_query_url(), &form, &headers).await?;
    let items: Vec<GradeItem> = parse_items(&body)?;
    tracing::debug!("Grade query returned {} rows", items.len());

    Ok(items.into_iter().map(Grade::from).collect())
}
