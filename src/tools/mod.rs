//! NutriLog Tools module
//!
//! Service functions behind the MCP tools.

pub mod backup;
pub mod days;
pub mod meals;
pub mod status;
pub mod templates;
