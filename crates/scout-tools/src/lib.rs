//! Tool framework for company-scout
//!
//! Defines the [`Tool`] trait agents call into, the [`ToolRegistry`] that
//! holds them, and the built-in web search tool the research agent uses.

pub mod error;
pub mod registry;
pub mod search;
pub mod tool;

pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use search::WebSearchTool;
pub use tool::Tool;
