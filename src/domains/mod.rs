//! Business logic, one module per bounded context.
//!
//! - `graph`: the Facebook Graph API client, pagination and normalization
//! - `tools`: MCP tools built on the Graph client
//! - `resources`: read-only documents for clients

pub mod graph;
pub mod resources;
pub mod tools;
