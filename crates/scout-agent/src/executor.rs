//! Agent executor for running the research loop
//!
//! The AgentExecutor implements the core agent loop pattern:
//! 1. Call LLM with conversation history and available tools
//! 2. Check stop reason
//! 3. If tool use requested, execute tools and loop back
//! 4. If completed, return final response

use crate::error::{AgentError, Result};
use scout_llm::{
    CompletionRequest, ContentBlock, LLMProvider, Message, ResponseFormat, StopReason,
    ToolDefinition,
};
use scout_tools::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of iterations (prevents infinite loops)
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,

    /// Structured output constraint applied to every completion
    pub response_format: Option<ResponseFormat>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "cogito:3b".to_string(),
            system_prompt: None,
            max_tokens: 4096,
            temperature: Some(0.2),
            response_format: None,
        }
    }
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
///
/// The AgentExecutor orchestrates the interaction between an LLM provider
/// and a tool registry, implementing the agent loop pattern.
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
        }
    }

    /// Execute the agent loop with a user query
    ///
    /// # Arguments
    ///
    /// * `user_message` - The user's input message
    ///
    /// # Returns
    ///
    /// The final response text from the agent after all tool calls are complete
    pub async fn run(&self, user_message: String) -> Result<String> {
        let mut conversation = vec![Message::user(user_message)];
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > self.config.max_iterations {
                warn!(
                    "Max iterations ({}) reached, stopping",
                    self.config.max_iterations
                );
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            info!(
                iteration = iteration,
                max_iterations = self.config.max_iterations,
                "Agent iteration started"
            );

            // Build tool definitions from registry
            let tools = self.build_tool_definitions();
            debug!(tool_count = tools.len(), "Available tools");

            let mut request_builder = CompletionRequest::builder(&self.config.model)
                .messages(conversation.clone())
                .system(
                    self.config
                        .system_prompt
                        .clone()
                        .unwrap_or_else(|| "You are a helpful assistant.".to_string()),
                )
                .max_tokens(self.config.max_tokens)
                .temperature(self.config.temperature.unwrap_or(0.2));

            // Only add tools if we have any
            if !tools.is_empty() {
                request_builder = request_builder.tools(tools);
            }

            if let Some(format) = self.config.response_format.clone() {
                request_builder = request_builder.response_format(format);
            }

            let request = request_builder.build();

            let response = self.provider.complete(request).await?;

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            // Add assistant message to conversation
            conversation.push(response.message.clone());

            // Check stop reason
            match response.stop_reason {
                StopReason::EndTurn => {
                    // Natural completion, extract text and return
                    let text = response.message.text().unwrap_or_default().to_string();
                    info!(
                        iteration = iteration,
                        response_length = text.len(),
                        "Agent completed naturally"
                    );
                    return Ok(text);
                }

                StopReason::ToolUse => {
                    // Extract and execute tool calls
                    let tool_uses = response.message.tool_uses();
                    info!(tool_count = tool_uses.len(), "Agent requested tool use");
                    let tool_results = self.execute_tools(&response.message).await?;

                    if tool_results.is_empty() {
                        warn!("No tool results despite ToolUse stop reason");
                        return Err(AgentError::ToolNotFound(
                            "model requested tool use without tool calls".to_string(),
                        ));
                    }

                    // Add tool results to conversation and continue the loop
                    conversation.extend(tool_results);
                }

                StopReason::MaxTokens => {
                    warn!("Hit max tokens in LLM response");
                    return Err(AgentError::Truncated);
                }
            }
        }
    }

    /// Build tool definitions from the registry
    fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    /// Execute tool calls from an assistant message
    ///
    /// A failing tool does not abort the loop; its error is fed back to the
    /// model as an error tool result so the model can recover or give up.
    async fn execute_tools(&self, message: &Message) -> Result<Vec<Message>> {
        let mut results = Vec::new();

        for tool_use in message.tool_uses() {
            if let ContentBlock::ToolUse { id, name, input } = tool_use {
                info!(tool_name = %name, tool_id = %id, "Executing tool");

                let tool = self
                    .tool_registry
                    .get(name)
                    .ok_or_else(|| AgentError::ToolNotFound(name.clone()))?;

                let start_time = std::time::Instant::now();
                match tool.execute(input.clone()).await {
                    Ok(result) => {
                        let result_str =
                            serde_json::to_string(&result).unwrap_or_else(|_| result.to_string());
                        info!(
                            tool_name = %name,
                            duration_ms = start_time.elapsed().as_millis() as u64,
                            result_length = result_str.len(),
                            "Tool execution succeeded"
                        );
                        results.push(Message::tool_result(id.clone(), result_str));
                    }
                    Err(e) => {
                        warn!(
                            tool_name = %name,
                            duration_ms = start_time.elapsed().as_millis() as u64,
                            error = %e,
                            "Tool execution failed"
                        );
                        results.push(Message::tool_error(id.clone(), format!("Error: {e}")));
                    }
                }
            }
        }

        Ok(results)
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Constrain completions to a JSON schema
    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.config.response_format = Some(format);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self.provider.ok_or_else(|| {
            AgentError::Provider(scout_llm::LLMError::ConfigurationError(
                "Provider not set".to_string(),
            ))
        })?;

        Ok(AgentExecutor::new(
            provider,
            self.tool_registry,
            self.config,
        ))
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scout_llm::{CompletionResponse, MessageContent, Role, TokenUsage};
    use scout_tools::Tool;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Provider that replays a scripted sequence of responses
    struct ScriptedProvider {
        responses: Mutex<Vec<CompletionResponse>>,
    }

    impl ScriptedProvider {
        fn new(mut responses: Vec<CompletionResponse>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> scout_llm::Result<CompletionResponse> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| scout_llm::LLMError::RequestFailed("script exhausted".to_string()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct StaticTool;

    #[async_trait]
    impl Tool for StaticTool {
        async fn execute(&self, _params: Value) -> scout_tools::Result<Value> {
            Ok(json!("Title: Apple\nURL: https://apple.com\nDescription: iPhones"))
        }

        fn name(&self) -> &str {
            "get_news_articles"
        }

        fn description(&self) -> &str {
            "Search the web"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object" })
        }
    }

    fn text_response(text: &str, stop_reason: StopReason) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason,
            usage: TokenUsage::default(),
        }
    }

    fn tool_use_response() -> CompletionResponse {
        CompletionResponse {
            message: Message {
                role: Role::Assistant,
                content: Some(MessageContent::Blocks(vec![ContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: "get_news_articles".to_string(),
                    input: json!({ "topic": "AAPL" }),
                }])),
            },
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage::default(),
        }
    }

    fn executor_with(
        responses: Vec<CompletionResponse>,
        registry: Arc<ToolRegistry>,
        max_iterations: usize,
    ) -> AgentExecutor {
        AgentExecutorBuilder::new()
            .provider(Arc::new(ScriptedProvider::new(responses)))
            .tool_registry(registry)
            .max_iterations(max_iterations)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_turn_completion() {
        let executor = executor_with(
            vec![text_response("done", StopReason::EndTurn)],
            Arc::new(ToolRegistry::new()),
            10,
        );

        let result = executor.run("AAPL".to_string()).await.unwrap();
        assert_eq!(result, "done");
    }

    #[tokio::test]
    async fn test_tool_loop_then_completion() {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(Arc::new(StaticTool));

        let executor = executor_with(
            vec![
                tool_use_response(),
                text_response("{\"ok\":true}", StopReason::EndTurn),
            ],
            registry,
            10,
        );

        let result = executor.run("AAPL".to_string()).await.unwrap();
        assert_eq!(result, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_unknown_tool_errors() {
        // Registry is empty, so the scripted tool call cannot be resolved
        let executor = executor_with(vec![tool_use_response()], Arc::new(ToolRegistry::new()), 10);

        let result = executor.run("AAPL".to_string()).await;
        assert!(matches!(result, Err(AgentError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(Arc::new(StaticTool));

        let executor = executor_with(
            vec![tool_use_response(), tool_use_response(), tool_use_response()],
            registry,
            2,
        );

        let result = executor.run("AAPL".to_string()).await;
        assert!(matches!(result, Err(AgentError::MaxIterations(2))));
    }

    #[tokio::test]
    async fn test_truncated_response() {
        let executor = executor_with(
            vec![text_response("partial", StopReason::MaxTokens)],
            Arc::new(ToolRegistry::new()),
            10,
        );

        let result = executor.run("AAPL".to_string()).await;
        assert!(matches!(result, Err(AgentError::Truncated)));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ExecutorConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.model, "cogito:3b");
        assert!(config.response_format.is_none());
    }

    #[test]
    fn test_builder_requires_provider() {
        let result = AgentExecutorBuilder::new().build();
        assert!(result.is_err());
    }
}
