//! Web search tool backed by the DuckDuckGo HTML endpoint
//!
//! The research agent calls this tool to ground its answers in live web
//! results. Results come from `html.duckduckgo.com`, which serves plain HTML
//! and needs no API key; the result anchors are extracted with regexes and
//! formatted as Title/URL/Description blocks for the model.

use crate::{Result, Tool, ToolError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const DEFAULT_MAX_RESULTS: usize = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One extracted search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Resolved target URL
    pub url: String,
    /// Result snippet
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    topic: String,
}

/// Web search tool
///
/// Advertised to the model as `get_news_articles`, matching the prompt that
/// instructs it to research company attributes via web search.
pub struct WebSearchTool {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl WebSearchTool {
    /// Create a search tool with default settings
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: SEARCH_ENDPOINT.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    /// Override the search endpoint (useful for tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the maximum number of results returned to the model
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Run a search and format the top results for the model
    async fn search(&self, topic: &str) -> Result<String> {
        info!(topic = %topic, "Running web search");

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", topic)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::ExecutionFailed(format!(
                "search endpoint returned HTTP {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        let results = parse_results(&html, self.max_results)?;
        debug!(count = results.len(), "Search results extracted");

        Ok(format_results(topic, &results))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params: SearchParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let formatted = self.search(&params.topic).await?;
        Ok(Value::String(formatted))
    }

    fn name(&self) -> &'static str {
        "get_news_articles"
    }

    fn description(&self) -> &'static str {
        "Search the web for recent information about a topic. \
         Returns the top results as title, URL, and description."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "Topic or query to search for"
                }
            },
            "required": ["topic"]
        })
    }
}

/// Extract up to `max_results` results from a DuckDuckGo HTML page
fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>> {
    // Anchors carry class="result__a" for titles, "result__snippet" for bodies
    let title_re =
        Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#)?;
    let snippet_re = Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#)?;
    let tag_re = Regex::new(r"<[^>]+>")?;

    let snippets: Vec<String> = snippet_re
        .captures_iter(html)
        .map(|cap| clean_fragment(&tag_re, &cap[1]))
        .collect();

    Ok(title_re
        .captures_iter(html)
        .take(max_results)
        .enumerate()
        .map(|(i, cap)| SearchResult {
            title: clean_fragment(&tag_re, &cap[2]),
            url: resolve_url(&cap[1]),
            snippet: snippets.get(i).cloned().unwrap_or_default(),
        })
        .collect())
}

/// Format results the way the agent prompt expects them
fn format_results(topic: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("Could not find news results for {topic}.");
    }

    results
        .iter()
        .map(|r| {
            format!(
                "Title: {}\nURL: {}\nDescription: {}",
                r.title, r.url, r.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Strip markup and decode the handful of entities DuckDuckGo emits
fn clean_fragment(tag_re: &Regex, fragment: &str) -> String {
    let text = tag_re.replace_all(fragment, "");
    decode_entities(text.trim())
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
}

/// Resolve a result href to the target URL
///
/// DuckDuckGo wraps targets in a redirect of the form
/// `//duckduckgo.com/l/?uddg=<percent-encoded-url>&rut=...`.
fn resolve_url(href: &str) -> String {
    let Some((_, query)) = href.split_once('?') else {
        return href.to_string();
    };

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "uddg")
        .map_or_else(|| href.to_string(), |(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <div class="result">
          <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.apple.com%2F&amp;rut=abc">Apple <b>Inc.</b></a>
          <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.apple.com%2F">Apple designs &amp; sells consumer electronics.</a>
        </div>
        <div class="result">
          <a rel="nofollow" class="result__a" href="https://example.com/direct">Example</a>
          <a class="result__snippet" href="https://example.com/direct">A direct link result.</a>
        </div>
    "#;

    #[test]
    fn test_parse_results() {
        let results = parse_results(SAMPLE_HTML, 5).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "Apple Inc.");
        assert_eq!(results[0].url, "https://www.apple.com/");
        assert_eq!(
            results[0].snippet,
            "Apple designs & sells consumer electronics."
        );

        assert_eq!(results[1].title, "Example");
        assert_eq!(results[1].url, "https://example.com/direct");
    }

    #[test]
    fn test_parse_results_respects_limit() {
        let results = parse_results(SAMPLE_HTML, 1).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_format_results_empty() {
        let formatted = format_results("AAPL", &[]);
        assert_eq!(formatted, "Could not find news results for AAPL.");
    }

    #[test]
    fn test_format_results() {
        let results = vec![SearchResult {
            title: "Apple Inc.".to_string(),
            url: "https://www.apple.com/".to_string(),
            snippet: "Consumer electronics.".to_string(),
        }];
        let formatted = format_results("AAPL", &results);
        assert!(formatted.starts_with("Title: Apple Inc.\n"));
        assert!(formatted.contains("URL: https://www.apple.com/"));
        assert!(formatted.contains("Description: Consumer electronics."));
    }

    #[test]
    fn test_resolve_url_redirect_wrapper() {
        assert_eq!(
            resolve_url("//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.apple.com%2F&rut=abc"),
            "https://www.apple.com/"
        );
    }

    #[test]
    fn test_resolve_url_passthrough() {
        assert_eq!(
            resolve_url("https://example.com/page"),
            "https://example.com/page"
        );
        assert_eq!(resolve_url("//duckduckgo.com/l/?rut=abc"), "//duckduckgo.com/l/?rut=abc");
    }

    #[test]
    fn test_resolve_url_malformed_escape_does_not_panic() {
        // A stray % followed by a multi-byte character must decode leniently
        assert_eq!(resolve_url("//duckduckgo.com/l/?uddg=%\u{20ac}x&rut=1"), "%\u{20ac}x");
    }

    #[test]
    fn test_tool_metadata() {
        let tool = WebSearchTool::new().unwrap();
        assert_eq!(tool.name(), "get_news_articles");
        assert!(!tool.description().is_empty());
        let schema = tool.input_schema();
        assert_eq!(schema["required"][0], "topic");
    }

    #[tokio::test]
    async fn test_execute_rejects_bad_params() {
        let tool = WebSearchTool::new().unwrap();
        let result = tool.execute(json!({ "query": "wrong key" })).await;
        assert!(matches!(result, Err(ToolError::InvalidParams(_))));
    }
}
