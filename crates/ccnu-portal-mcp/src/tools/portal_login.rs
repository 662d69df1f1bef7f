//! Tool `portal_login`: Check a student's CAS credentials.

use serde_json::{json, Value};

use ccnu_portal::AcademicPortal;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::args::{self, CredentialArgs};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "portal_login".to_string(),
        description: Some("Verify a student id and password against the CAS login".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": args::credential_properties(),
            "required": ["student_id", "password"]
        }),
    }
}

pub async fn execute(args: Value, portal: &AcademicPortal) -> McpResult<ToolCallResult> {
    let params: CredentialArgs = args::parse(args)?;
    let success = portal.login(&params.credential).await?;

    Ok(ToolCallResult::json(&json!({ "success": success })))
}
