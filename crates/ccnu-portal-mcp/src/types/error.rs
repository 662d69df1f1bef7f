//! Service errors and their JSON-RPC codes.

use ccnu_portal::PortalError;

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId, JSONRPC_VERSION};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Codes for failures reported by the portal itself.
pub mod portal_error_codes {
    pub const TOOL_NOT_FOUND: i32 = -32803;
    /// CAS rejected the credentials. Retrying will not help.
    pub const INVALID_CREDENTIAL: i32 = -32850;
    /// Connection, timeout or 5xx. Safe to retry later.
    pub const PORTAL_UNAVAILABLE: i32 = -32851;
    /// The portal answered with something that is not the expected JSON/HTML.
    pub const PORTAL_RESPONSE: i32 = -32852;
}

#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Portal unavailable: {0}")]
    PortalUnavailable(String),

    #[error("Unexpected portal response: {0}")]
    PortalResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use portal_error_codes::*;
        match self {
            McpError::ParseError(_) | McpError::Json(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::InternalError(_) | McpError::Io(_) => INTERNAL_ERROR,
            McpError::ToolNotFound(_) => TOOL_NOT_FOUND,
            McpError::InvalidCredential => INVALID_CREDENTIAL,
            McpError::PortalUnavailable(_) => PORTAL_UNAVAILABLE,
            McpError::PortalResponse(_) => PORTAL_RESPONSE,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code: self.code(),
                message: self.to_string(),
                data: None,
            },
        }
    }
}

impl From<PortalError> for McpError {
    fn from(e: PortalError) -> Self {
        match e {
            PortalError::InvalidCredential => McpError::InvalidCredential,
            PortalError::NetworkFailure(msg) => McpError::PortalUnavailable(msg),
            PortalError::ParseFailure(msg) => McpError::PortalResponse(msg),
            PortalError::InvalidInput(msg) => McpError::InvalidParams(msg),
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;
