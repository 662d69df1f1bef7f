//! Term numbering and query windows.
//!
//! The platform numbers terms 1/2/3 (fall, spring, summer). The portal's
//! query forms expect its own codes 3/12/16 in the `xqm` field.

use serde::{Deserialize, Serialize};

use crate::types::{PortalError, PortalResult};

/// An academic term as the platform numbers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Fall,
    Spring,
    Summer,
}

impl Term {
    /// Parse the platform-facing term number.
    pub fn from_external(s: &str) -> Option<Term> {
        match s {
            "1" => Some(Term::Fall),
            "2" => Some(Term::Spring),
            "3" => Some(Term::Summer),
            _ => None,
        }
    }

    /// The platform-facing term number.
    pub fn external(self) -> &'static str {
        match self {
            Term::Fall => "1",
            Term::Spring => "2",
            Term::Summer => "3",
        }
    }

    /// The portal's internal term code.
    pub fn portal_code(self) -> &'static str {
        match self {
            Term::Fall => "3",
            Term::Spring => "12",
            Term::Summer => "16",
        }
    }
}

/// Translate an external term number to the portal code, `""` when unknown.
///
/// Used for term values echoed back by the portal itself, which are not
/// validated again.
pub fn term_code(external: &str) -> &'static str {
    Term::from_external(external).map_or("", Term::portal_code)
}

/// A validated year/term query window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Period {
    year: String,
    term: Option<Term>,
}

impl Period {
    /// Every year, every term.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(year: impl Into<String>, term: Option<Term>) -> PortalResult<Self> {
        let year = normalize_year(&year.into())?;
        Ok(Self { year, term })
    }

    /// Validate raw boundary strings.
    ///
    /// `year` may be empty or `"0"` for all years, otherwise all digits.
    /// `term` may be empty or `"0"` for all terms, otherwise 1, 2 or 3.
    pub fn parse(year: &str, term: &str) -> PortalResult<Self> {
        let term = match term {
            "" | "0" => None,
            other => Some(Term::from_external(other).ok_or_else(|| {
                PortalError::InvalidInput(format!("unknown term '{other}', expected 1, 2 or 3"))
            })?),
        };
        Self::new(year, term)
    }

    /// The `xnm` form value.
    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn term(&self) -> Option<Term> {
        self.term
    }

    /// The `xqm` form value.
    pub fn term_code(&self) -> &'static str {
        self.term.map_or("", Term::portal_code)
    }
}

fn normalize_year(year: &str) -> PortalResult<String> {
    match year {
        "" | "0" => Ok(String::new()),
        y if y.chars().all(|c| c.is_ascii_digit()) => Ok(y.to_string()),
        other => Err(PortalError::InvalidInput(format!(
            "year must be numeric, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_code_mapping() {
        assert_eq!(term_code("1"), "3");
        assert_eq!(term_code("2"), "12");
        assert_eq!(term_code("3"), "16");
    }

    #[test]
    fn test_term_code_unknown_is_empty() {
        assert_eq!(term_code(""), "");
        assert_eq!(term_code("0"), "");
        assert_eq!(term_code("4"), "");
        assert_eq!(term_code("12"), "");
    }

    #[test]
    fn test_term_roundtrip_external() {
        for t in [Term::Fall, Term::Spring, Term::Summer] {
            assert_eq!(Term::from_external(t.external()), Some(t));
        }
    }

    #[test]
    fn test_period_year_zero_is_all_years() {
        let p = Period::parse("0", "1").unwrap();
        assert_eq!(p.year(), "");
        assert_eq!(p.term_code(), "3");
    }

    #[test]
    fn test_period_keeps_explicit_year() {
        let p = Period::parse("2023", "2").unwrap();
        assert_eq!(p.year(), "2023");
        assert_eq!(p.term(), Some(Term::Spring));
        assert_eq!(p.term_code(), "12");
    }

    #[test]
    fn test_period_empty_term_is_all_terms() {
        let p = Period::parse("", "").unwrap();
        assert_eq!(p, Period::all());
        assert_eq!(p.term_code(), "");
    }

    #[test]
    fn test_period_rejects_unknown_term() {
        let err = Period::parse("2023", "Fall").unwrap_err();
        assert!(matches!(err, PortalError::InvalidInput(_)));
    }

    #[test]
    fn test_period_rejects_non_numeric_year() {
        let err = Period::parse("2023-2024", "1").unwrap_err();
        assert!(matches!(err, PortalError::InvalidInput(_)));
    }
}
