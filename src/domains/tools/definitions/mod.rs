//! Tool definitions, one file per tool.

pub mod common;
pub mod entities;
pub mod insights;

pub use entities::{ListAdAccountsTool, ListAdSetsTool, ListAdsTool, ListCampaignsTool};
pub use insights::{AccountInsightsTool, CampaignInsightsTool};
