//! Core data types for portal credentials, scraped records, and errors.

use serde::{Deserialize, Serialize};

/// A student's portal login. Held only for the duration of one call.
#[derive(Clone, Deserialize)]
pub struct Credential {
    pub student_id: String,
    pub password: String,
}

impl Credential {
    pub fn new(student_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("student_id", &self.student_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A course the student is (or was) enrolled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Portal course number (`kch`).
    pub course_id: String,
    pub name: String,
    /// Comma-joined instructor names.
    pub teacher: String,
    /// Teaching class name (`jxbmc`).
    pub class: String,
    /// Offering school.
    pub school: String,
    /// Course property, e.g. compulsory or elective.
    pub property: String,
    pub credit: f64,
    pub year: String,
    pub term: String,
}

/// A graded course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub course: Course,
    pub regular: f64,
    #[serde(rename = "final")]
    pub final_score: f64,
    pub total: f64,
    pub year: String,
    pub term: String,
    /// Class-section id (`jxb_id`), the key for the score breakdown.
    pub class_section_id: String,
}

/// Where `course_list` reads its rows from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseSource {
    /// The enrollment query module.
    #[default]
    Legacy,
    /// The grade query module; only lists courses that already have a grade.
    GradeDerived,
}

impl std::str::FromStr for CourseSource {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "legacy" => Ok(CourseSource::Legacy),
            "grade_derived" | "grade" => Ok(CourseSource::GradeDerived),
            other => Err(PortalError::InvalidInput(format!(
                "unknown course source '{other}', expected 'legacy' or 'grade_derived'"
            ))),
        }
    }
}

/// Errors that can occur while talking to the academic portal.
#[derive(thiserror::Error, Debug)]
pub enum PortalError {
    /// The portal did not issue a session cookie for this login.
    #[error("Invalid student id or password")]
    InvalidCredential,

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Unexpected portal response: {0}")]
    ParseFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PortalError {
    /// The portal itself rejected the caller; retrying with the same input is pointless.
    pub fn is_authoritative(&self) -> bool {
        matches!(self, PortalError::InvalidCredential)
    }

    /// The failure may clear up on its own; callers may retry with a fresh login or degrade.
    pub fn is_transient(&self) -> bool {
        matches!(self, PortalError::NetworkFailure(_))
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(e: reqwest::Error) -> Self {
        PortalError::NetworkFailure(e.to_string())
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(e: serde_json::Error) -> Self {
        PortalError::ParseFailure(e.to_string())
    }
}

/// Convenience result type.
pub type PortalResult<T> = Result<T, PortalError>;
