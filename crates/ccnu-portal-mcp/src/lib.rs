//! ccnu-portal-mcp: JSON-RPC tools over the CCNU academic portal engine.

pub mod config;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_portal_config, ConfigOverrides};
pub use protocol::ProtocolHandler;
pub use transport::StdioTransport;
