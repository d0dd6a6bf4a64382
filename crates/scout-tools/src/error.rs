//! Error types for tool execution

use thiserror::Error;

/// Result type for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors that can occur while executing a tool
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool input did not match the declared schema
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Tool body failed
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Result extraction pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
