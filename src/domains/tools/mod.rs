//! Tools domain module.
//!
//! Exposes the Graph API reporting operations as MCP tools.
//!
//! ## Architecture
//!
//! - `definitions/` - one file per tool (params, `execute`, route, HTTP handler)
//! - `router.rs` - builds the rmcp `ToolRouter` used by the STDIO transport
//! - `registry.rs` - tool metadata and HTTP dispatch
//! - `error.rs` - tool dispatch errors
//!
//! A new tool is added to `definitions/`, then to both `router.rs` and
//! `registry.rs`; the router tests check that the two lists agree.

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
