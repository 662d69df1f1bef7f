//! Argument shapes shared by the portal tools.

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use ccnu_portal::{Credential, Period};

use crate::types::{McpError, McpResult};

#[derive(Debug, Deserialize)]
pub struct CredentialArgs {
    #[serde(flatten)]
    pub credential: Credential,
}

/// Credential plus a year/term window.
#[derive(Debug, Deserialize)]
pub struct PeriodArgs {
    #[serde(flatten)]
    pub credential: Credential,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub term: String,
}

impl PeriodArgs {
    pub fn period(&self) -> McpResult<Period> {
        Ok(Period::parse(self.year.trim(), self.term.trim())?)
    }
}

/// Deserialize tool arguments, mapping shape errors to INVALID_PARAMS and
/// rejecting a blank student id or password.
pub fn parse<T>(args: Value) -> McpResult<T>
where
    T: for<'de> Deserialize<'de> + HasCredential,
{
    let parsed: T =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    let credential = parsed.credential();
    if credential.student_id.trim().is_empty() {
        return Err(McpError::InvalidParams("student_id must not be empty".to_string()));
    }
    if credential.password.is_empty() {
        return Err(McpError::InvalidParams("password must not be empty".to_string()));
    }
    Ok(parsed)
}

pub trait HasCredential {
    fn credential(&self) -> &Credential;
}

impl HasCredential for CredentialArgs {
    fn credential(&self) -> &Credential {
        &self.credential
    }
}

impl HasCredential for PeriodArgs {
    fn credential(&self) -> &Credential {
        &self.credential
    }
}

/// Schema properties every tool shares.
pub fn credential_properties() -> serde_json::Map<String, Value> {
    let mut props = serde_json::Map::new();
    props.insert(
        "student_id".to_string(),
        json!({ "type": "string", "description": "Student number used as the CAS username" }),
    );
    props.insert(
        "password".to_string(),
        json!({ "type": "string", "description": "CAS password; used for this call only" }),
    );
    props
}

pub fn period_properties() -> serde_json::Map<String, Value> {
    let mut props = credential_properties();
    props.insert(
        "year".to_string(),
        json!({
            "type": "string",
            "description": "Academic year start, e.g. \"2023\"; empty or \"0\" for all years"
        }),
    );
    props.insert(
        "term".to_string(),
        json!({
            "type": "string",
            "enum": ["", "0", "1", "2", "3"],
            "description": "1 = fall, 2 = spring, 3 = summer; empty or \"0\" for all terms"
        }),
    );
    props
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}
