use crate::tools::extract_string_arg;
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;

const MAX_CONTENT_CHARS: usize = 50_000;

pub struct WebScrapeTool {
    client: reqwest::Client,
}

impl Default for WebScrapeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WebScrapeTool {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

#[async_trait]
impl Tool for WebScrapeTool {
    fn name(&self) -> &str {
        "web_scrape"
    }

    fn description(&self) -> &str {
        "Fetch the text content of a web page by URL"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "Absolute http(s) URL of the page to fetch"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let url = extract_string_arg(&args, "url")?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Ok(ToolResult::error(format!(
                "Refusing to fetch non-http(s) URL: {}",
                url
            )));
        }

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return Ok(ToolResult::error(format!("Request failed: {}", e))),
        };

        if !response.status().is_success() {
            return Ok(ToolResult::error(format!(
                "Fetch failed with status {}",
                response.status()
            )));
        }

        match response.text().await {
            Ok(body) => Ok(ToolResult::success(truncate(&body))),
            Err(e) => Ok(ToolResult::error(format!("Failed to read body: {}", e))),
        }
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_CONTENT_CHARS {
        return body.to_string();
    }
    let kept: String = body.chars().take(MAX_CONTENT_CHARS).collect();
    format!("{}\n[... truncated at {} chars]", kept, MAX_CONTENT_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn rejects_non_http_urls() {
        let tool = WebScrapeTool::new();
        let result = tool
            .execute(json!({"url": "file:///etc/passwd"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("non-http"));
    }

    #[tokio::test]
    async fn missing_url_is_an_argument_error() {
        let tool = WebScrapeTool::new();
        assert!(tool.execute(json!({})).await.is_err());
    }

    #[test]
    fn truncate_leaves_short_bodies_alone() {
        assert_eq!(truncate("hello"), "hello");
    }

    #[test]
    fn truncate_caps_long_bodies() {
        let long = "x".repeat(MAX_CONTENT_CHARS + 10);
        let out = truncate(&long);
        assert!(out.contains("truncated"));
        assert!(out.chars().count() < long.chars().count() + 50);
    }
}
