//! Facebook Ads MCP Server
//!
//! A Model Context Protocol server exposing Facebook Marketing API reporting
//! data: ad accounts, campaigns, ad sets, ads and insights. Every listing
//! follows the Graph API cursor to the end, and insights rows can be
//! flattened into analysis-ready records with numeric typing.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the server handler and transports
//! - **domains**:
//!   - **graph**: Graph API client, pager and insights normalizer
//!   - **tools**: MCP tools that call the Graph client
//!   - **resources**: the insights catalog and server info
//!
//! # Example
//!
//! ```rust,no_run
//! use facebook_ads_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
pub use domains::graph::{GraphClient, GraphError};
