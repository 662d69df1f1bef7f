//! Tool `course_list`: List the student's courses for a year/term.

use serde::Deserialize;
use serde_json::{json, Value};

use ccnu_portal::{AcademicPortal, CourseSource};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::args::{self, PeriodArgs};

#[derive(Debug, Deserialize)]
struct SourceArg {
    #[serde(default)]
    source: Option<String>,
}

pub fn definition() -> ToolDefinition {
    let mut properties = args::period_properties();
    properties.insert(
        "source".to_string(),
        json!({
            "type": "string",
            "enum": ["legacy", "grade_derived"],
            "default": "legacy",
            "description": "legacy reads the enrollment list; grade_derived lists graded courses"
        }),
    );

    ToolDefinition {
        name: "course_list".to_string(),
        description: Some("List enrolled courses for a year and term".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": ["student_id", "password"]
        }),
    }
}

pub async fn execute(args: Value, portal: &AcademicPortal) -> McpResult<ToolCallResult> {
    let source: SourceArg =
        serde_json::from_value(args.clone()).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    let source: CourseSource = source.source.as_deref().unwrap_or_default().parse()?;

    let params: PeriodArgs = args::parse(args)?;
    let period = params.period()?;

    let courses = portal
        .course_list(&params.credential, &period, source)
        .await?;

    Ok(ToolCallResult::json(&json!({
        "source": source,
        "total": courses.len(),
        "courses": courses,
    })))
}
