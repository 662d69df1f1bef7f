//! Tool `get_grades`: Grade summary (totals only).

use serde_json::{json, Value};

use ccnu_portal::AcademicPortal;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::args::{self, PeriodArgs};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_grades".to_string(),
        description: Some("Fetch total scores for a year and term".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": args::period_properties(),
            "required": ["student_id", "password"]
        }),
    }
}

pub async fn execute(args: Value, portal: &AcademicPortal) -> McpResult<ToolCallResult> {
    let params: PeriodArgs = args::parse(args)?;
    let period = params.period()?;

    let grades = portal.grades(&params.credential, &period).await?;

    Ok(ToolCallResult::json(&json!({
        "total": grades.len(),
        "grades": grades,
    })))
}
