//! Tool `get_detailed_grades`: Grades with regular/final/total breakdown.

use serde_json::{json, Value};

use ccnu_portal::AcademicPortal;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::args::{self, PeriodArgs};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_detailed_grades".to_string(),
        description: Some(
            "Fetch grades with regular, final and total scores; one portal request per course"
                .to_string(),
        ),
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

    let grades = portal.detailed_grades(&params.credential, &period).await?;

    Ok(ToolCallResult::json(&json!({
        "total": grades.len(),
        "grades": grades,
    })))
}
