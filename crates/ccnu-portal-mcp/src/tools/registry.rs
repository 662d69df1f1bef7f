//! Tool registration and dispatch.

use serde_json::Value;

use ccnu_portal::AcademicPortal;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{course_list, get_detailed_grades, get_grades, portal_login};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            portal_login::definition(),
            course_list::definition(),
            get_grades::definition(),
            get_detailed_grades::definition(),
        ]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        portal: &AcademicPortal,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "portal_login" => portal_login::execute(args, portal).await,
            "course_list" => course_list::execute(args, portal).await,
            "get_grades" => get_grades::execute(args, portal).await,
            "get_detailed_grades" => get_detailed_grades::execute(args, portal).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}
