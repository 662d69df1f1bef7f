//! Parsing helpers shared by the scrapers.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::types::{PortalError, PortalResult};

/// Every portal query endpoint wraps its rows in `{"items": [...]}`.
#[derive(Debug, Deserialize)]
struct ItemList<T> {
    items: Vec<T>,
}

/// Decode the `items` array of a portal JSON response.
///
/// A body that is not JSON (the portal answers an expired session with its
/// HTML login page) or lacks `items` is a [`PortalError::ParseFailure`].
pub fn parse_items<T: DeserializeOwned>(body: &str) -> PortalResult<Vec<T>> {
    let list: ItemList<T> = serde_json::from_str(body).map_err(|e| {
        PortalError::ParseFailure(format!("expected {{\"items\": [...]}} JSON: {e}"))
    })?;
    Ok(list.items)
}

/// Parse a credit or score field, falling back to `0.0`.
///
/// The portal sends blanks, `"N/A"` and grade words in numeric fields; those
/// count as zero rather than failing the whole scrape. Non-finite values are
/// treated the same way.
pub fn parse_decimal_or_zero(s: &str) -> f64 {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Reduce a `jsxx` field to instructor names.
///
/// `"2008980036/宋冰玉/讲师,1234567/张三/教授"` becomes `"宋冰玉,张三"`. A
/// segment without `/` is taken as a bare name.
pub fn merge_teacher_names(jsxx: &str) -> String {
    if jsxx.is_empty() {
        return String::new();
    }
    jsxx.split(',')
        .map(|entry| {
            let mut parts = entry.split('/');
            let first = parts.next().unwrap_or_default();
            parts.next().unwrap_or(first)
        })
        .collect::<Vec<_>>()
        .join(",")
}
