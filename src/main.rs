//! Facebook Ads MCP server entry point.
//!
//! Logs go to stderr; with the STDIO transport stdout is the protocol channel.

use anyhow::{Context, Result};
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use facebook_ads_mcp_server::core::config::LoggingConfig;
use facebook_ads_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging(&LoggingConfig::from_env());

    let config = Config::from_env();
    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = match McpServer::new(config.clone()) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return Err(e).context("failed to initialize the Facebook Ads MCP server");
        }
    };
    info!(
        api_version = %config.graph.api_version,
        timeout_secs = config.graph.timeout_secs,
        "Server initialized"
    );

    TransportService::new(config.transport).run(server).await?;

    info!("Server shutting down");
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
