use crate::error::{AgentError, Result};
use crate::traits::{ChatMessage, ChatRequest, ChatResponse, Provider, ToolCall, ToolSpec};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool<'a>>>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: WireContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent<'a> {
    Text(&'a str),
    Blocks(Vec<WireBlock<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireBlock<'a> {
    Text {
        text: &'a str,
    },
    ToolUse {
        id: &'a str,
        name: &'a str,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: &'a str,
        content: &'a str,
    },
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Unknown,
}

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            model: crate::config::DEFAULT_MODEL.to_string(),
            max_tokens: crate::config::DEFAULT_MAX_TOKENS,
            base_url: "https://api.anthropic.com".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_body<'a>(&'a self, request: &ChatRequest<'a>) -> Result<MessagesRequest<'a>> {
        Ok(MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: request.system,
            tools: request.tools.map(convert_tools),
            messages: convert_messages(request.messages)?,
        })
    }
}

// Consecutive tool entries must collapse into one user turn of tool_result
// blocks; the messages API rejects back-to-back user turns.
fn convert_messages(messages: &[ChatMessage]) -> Result<Vec<WireMessage<'_>>> {
    let mut wire: Vec<WireMessage> = Vec::new();

    for message in messages {
        match message.role.as_str() {
            "tool" => {
                let tool_use_id = message.tool_call_id.as_deref().ok_or_else(|| {
                    AgentError::Protocol("tool entry is missing its tool_call_id".to_string())
                })?;
                let block = WireBlock::ToolResult {
                    tool_use_id,
                    content: &message.content,
                };

                if let Some(last) = wire.last_mut()
                    && last.role == "user"
                    && let WireContent::Blocks(blocks) = &mut last.content
                {
                    blocks.push(block);
                } else {
                    wire.push(WireMessage {
                        role: "user",
                        content: WireContent::Blocks(vec![block]),
                    });
                }
            }
            "assistant" if message.tool_calls.is_some() => {
                let mut blocks = Vec::new();
                if !message.content.is_empty() {
                    blocks.push(WireBlock::Text {
                        text: &message.content,
                    });
                }
                for call in message.tool_calls.as_deref().unwrap_or_default() {
                    let input = serde_json::from_str(&call.arguments)
                        .unwrap_or_else(|_| serde_json::json!({}));
                    blocks.push(WireBlock::ToolUse {
                        id: &call.id,
                        name: &call.name,
                        input,
                    });
                }
                wire.push(WireMessage {
                    role: "assistant",
                    content: WireContent::Blocks(blocks),
                });
            }
            role => {
                wire.push(WireMessage {
                    role,
                    content: WireContent::Text(&message.content),
                });
            }
        }
    }

    Ok(wire)
}

fn convert_tools(tools: &[ToolSpec]) -> Vec<WireTool<'_>> {
    tools
        .iter()
        .map(|t| WireTool {
            name: &t.name,
            description: &t.description,
            input_schema: &t.parameters_schema,
        })
        .collect()
}

fn parse_body(body: &str) -> Result<ChatResponse> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| AgentError::Protocol(format!("unexpected response shape: {}", e)))?;

    if parsed.content.is_empty() {
        return Err(AgentError::Protocol(
            "response carried an empty content array".to_string(),
        ));
    }

    let mut text = None;
    let mut tool_calls = Vec::new();
    for block in parsed.content {
        match block {
            ResponseBlock::Text { text: t } => {
                if text.is_none() {
                    text = Some(t);
                }
            }
            ResponseBlock::ToolUse { id, name, input } => {
                tool_calls.push(ToolCall {
                    id,
                    name,
                    arguments: input.to_string(),
                });
            }
            ResponseBlock::Unknown => {}
        }
    }

    if text.is_none() && tool_calls.is_empty() {
        return Err(AgentError::Protocol(
            "response contained no text or tool_use blocks".to_string(),
        ));
    }

    Ok(ChatResponse { text, tool_calls })
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
        let body = self.build_body(&request)?;

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            "sending messages request"
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        parse_body(&body)
    }
}
