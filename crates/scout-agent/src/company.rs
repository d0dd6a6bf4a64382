//! The concrete company research fetcher

use crate::executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig};
use crate::prompts;
use async_trait::async_trait;
use scout_core::{CompanyFetcher, CompanyInfo, FetchError, Ticker};
use scout_llm::{LLMProvider, ResponseFormat};
use scout_tools::{ToolRegistry, WebSearchTool};
use std::sync::Arc;
use tracing::debug;

/// Configuration for the company research agent
#[derive(Debug, Clone)]
pub struct CompanyAgentConfig {
    /// Model identifier
    pub model: String,
    /// Max tokens per completion
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Bound on the tool-use loop
    pub max_iterations: usize,
}

impl Default for CompanyAgentConfig {
    fn default() -> Self {
        Self {
            model: "cogito:3b".to_string(),
            max_tokens: 4096,
            temperature: 0.2,
            max_iterations: 10,
        }
    }
}

/// Research agent that fills in a [`CompanyInfo`] record for one ticker
///
/// Wraps an [`AgentExecutor`] configured with the web search tool, the
/// company research prompt, and a structured-output constraint on the
/// CompanyInfo schema. This is the concrete [`CompanyFetcher`] the batch
/// orchestrator drives.
pub struct CompanyAgent {
    executor: AgentExecutor,
}

impl CompanyAgent {
    /// Create a research agent with the default tool set (web search)
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        config: CompanyAgentConfig,
    ) -> crate::Result<Self> {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(Arc::new(WebSearchTool::new()?));
        Self::with_registry(provider, registry, config)
    }

    /// Create a research agent with a custom tool registry
    pub fn with_registry(
        provider: Arc<dyn LLMProvider>,
        registry: Arc<ToolRegistry>,
        config: CompanyAgentConfig,
    ) -> crate::Result<Self> {
        let executor = AgentExecutorBuilder::new()
            .provider(provider)
            .tool_registry(registry)
            .config(ExecutorConfig {
                max_iterations: config.max_iterations,
                model: config.model,
                system_prompt: Some(prompts::COMPANY_RESEARCH.to_string()),
                max_tokens: config.max_tokens,
                temperature: Some(config.temperature),
                response_format: Some(ResponseFormat::json_schema(
                    "CompanyInfo",
                    CompanyInfo::json_schema(),
                )),
            })
            .build()?;

        Ok(Self { executor })
    }
}

#[async_trait]
impl CompanyFetcher for CompanyAgent {
    async fn fetch(&self, ticker: &Ticker) -> scout_core::Result<CompanyInfo> {
        let text = self
            .executor
            .run(ticker.to_string())
            .await
            .map_err(|e| FetchError::AgentFailed {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            })?;

        let json = extract_json(&text);
        debug!(ticker = %ticker, "Parsing agent output");

        serde_json::from_str(json).map_err(|e| FetchError::SchemaMismatch {
            ticker: ticker.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Pull the JSON object out of the model's final message
///
/// Small local models often wrap structured output in code fences or a line
/// of prose. Strips a ```json fence if present, otherwise slices from the
/// first `{` to the last `}`.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(fence_start) = trimmed.find("```") {
        let after = &trimmed[fence_start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(fence_end) = after.find("```") {
            return after[..fence_end].trim();
        }
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}
