//! Research agent for company-scout
//!
//! Implements the agent loop (LLM call, tool dispatch, repeat until the model
//! ends its turn) and [`CompanyAgent`], the concrete
//! [`scout_core::CompanyFetcher`] that turns a ticker into a
//! [`scout_core::CompanyInfo`] record by prompting a model with a web-search
//! tool and coercing its structured output.

pub mod company;
pub mod error;
pub mod executor;
pub mod prompts;

pub use company::{CompanyAgent, CompanyAgentConfig};
pub use error::{AgentError, Result};
pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig};
