//! Protocol version and client capability negotiation.

use crate::types::{ClientCapabilities, InitializeParams, InitializeResult, MCP_VERSION};

#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client: ClientCapabilities,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    /// Accept any client version; the server always answers with its own.
    pub fn negotiate(&mut self, params: InitializeParams) -> InitializeResult {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, answering with {}",
                params.protocol_version,
                MCP_VERSION
            );
        }

        tracing::info!(
            "Client connected: {} v{}",
            params.client_info.name,
            params.client_info.version
        );
        self.client = params.capabilities;

        InitializeResult::default_result()
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
        tracing::info!("Handshake complete");
    }
}
