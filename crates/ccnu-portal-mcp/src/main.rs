//! ccnu-portal-mcp: entry point.

use std::sync::Arc;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use ccnu_portal::AcademicPortal;
use ccnu_portal_mcp::config::{resolve_portal_config, ConfigOverrides};
use ccnu_portal_mcp::protocol::ProtocolHandler;
use ccnu_portal_mcp::tools::ToolRegistry;
use ccnu_portal_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "ccnu-portal-mcp",
    about = "JSON-RPC tools for the CCNU academic portal: login, course list, grades",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    portal: PortalFlags,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Portal endpoints and timeouts. Each falls back to its CCNU_* variable.
#[derive(Args, Debug, Clone, Default)]
struct PortalFlags {
    /// CAS base URL [env: CCNU_CAS_URL].
    #[arg(long, global = true)]
    cas_url: Option<String>,

    /// Academic system base URL [env: CCNU_XK_URL].
    #[arg(long, global = true)]
    xk_url: Option<String>,

    /// Timeout for login requests, in milliseconds [env: CCNU_AUTH_TIMEOUT_MS].
    #[arg(long, global = true)]
    auth_timeout_ms: Option<u64>,

    /// Timeout for scrape requests, in milliseconds [env: CCNU_SCRAPE_TIMEOUT_MS].
    #[arg(long, global = true)]
    scrape_timeout_ms: Option<u64>,
}

impl From<PortalFlags> for ConfigOverrides {
    fn from(flags: PortalFlags) -> Self {
        ConfigOverrides {
            cas_url: flags.cas_url,
            xk_url: flags.xk_url,
            auth_timeout_ms: flags.auth_timeout_ms,
            scrape_timeout_ms: flags.scrape_timeout_ms,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve tools over stdio (default).
    Serve,

    /// Print server capabilities, tools and resolved portal config as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Example:
    ///   ccnu-portal-mcp completions bash > ccnu-portal-mcp.bash
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let overrides = ConfigOverrides::from(cli.portal.clone());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = resolve_portal_config(&overrides);
            tracing::info!("CCNU portal service");
            tracing::info!("CAS: {}  academic system: {}", config.cas_url, config.xk_url);

            let portal = Arc::new(AcademicPortal::new(config));
            let transport = StdioTransport::new(ProtocolHandler::new(portal));
            transport.run().await?;
        }

        Commands::Info => {
            let config = resolve_portal_config(&overrides);
            let capabilities = ccnu_portal_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
                "portal": {
                    "cas_url": config.cas_url,
                    "xk_url": config.xk_url,
                    "auth_timeout_ms": config.auth_timeout.as_millis() as u64,
                    "scrape_timeout_ms": config.scrape_timeout.as_millis() as u64,
                },
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "ccnu-portal-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}
