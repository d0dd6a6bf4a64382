//! Error types for agent execution

use thiserror::Error;

/// Result type for agent execution
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors that can occur while running the agent loop
#[derive(Error, Debug)]
pub enum AgentError {
    /// The LLM provider failed
    #[error("Provider error: {0}")]
    Provider(#[from] scout_llm::LLMError),

    /// The model requested a tool that is not registered
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A tool could not be constructed
    #[error("Tool setup failed: {0}")]
    ToolSetup(#[from] scout_tools::ToolError),

    /// The loop hit its iteration bound without the model ending its turn
    #[error("Max iterations ({0}) reached without completion")]
    MaxIterations(usize),

    /// The model response was truncated by the token limit
    #[error("Response truncated by token limit")]
    Truncated,
}
