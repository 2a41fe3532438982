use crate::error::{AgentError, Result};
use crate::traits::{ChatRequest, ChatResponse, Provider, ToolRunner, ToolSpec};
use crate::transcript::Transcript;
use std::sync::Arc;

pub struct SupportSession {
    provider: Arc<dyn Provider>,
    tool_runner: Arc<dyn ToolRunner>,
    system_prompt: String,
    transcript: Transcript,
}

impl SupportSession {
    pub fn new(
        provider: Arc<dyn Provider>,
        tool_runner: Arc<dyn ToolRunner>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tool_runner,
            system_prompt: system_prompt.into(),
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub async fn ask(&mut self, question: &str) -> Result<String> {
        self.transcript.push_user(question);

        let tools = self.tool_runner.list_tools();

        let first = self.request(&tools).await?;
        if first.has_tool_calls() {
            tracing::debug!(calls = first.tool_calls.len(), "model requested tools");
            self.transcript.push_assistant_with_tool_calls(
                first.text_or_empty().to_string(),
                first.tool_calls.clone(),
            );
            let results = self.tool_runner.execute_requested(&first).await?;
            self.transcript.extend(results);
        }

        let second = self.request(&tools).await?;
        let reply = second.text.ok_or_else(|| {
            AgentError::Protocol("final response carried no text block".to_string())
        })?;

        self.transcript.push_assistant(reply.clone());
        Ok(reply)
    }

    async fn request(&self, tools: &[ToolSpec]) -> Result<ChatResponse> {
        let request = ChatRequest {
            system: &self.system_prompt,
            messages: self.transcript.messages(),
            tools: if tools.is_empty() { None } else { Some(tools) },
        };
        self.provider.chat(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ChatMessage, ToolCall};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct FakeProvider {
        scripted: Mutex<VecDeque<ChatResponse>>,
        seen_systems: Mutex<Vec<String>>,
        seen_message_counts: Mutex<Vec<usize>>,
    }

    impl FakeProvider {
        fn new(responses: Vec<ChatResponse>) -> Self {
            Self {
                scripted: Mutex::new(responses.into()),
                seen_systems: Mutex::new(Vec::new()),
                seen_message_counts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen_systems.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Provider for FakeProvider {
        async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
            self.seen_systems
                .lock()
                .unwrap()
                .push(request.system.to_string());
            self.seen_message_counts
                .lock()
                .unwrap()
                .push(request.messages.len());
            self.scripted
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AgentError::Protocol("fake ran out of responses".to_string()))
        }
    }

    struct FakeRunner {
        entries: Vec<ChatMessage>,
        executions: Mutex<usize>,
    }

    impl FakeRunner {
        fn new(entries: Vec<ChatMessage>) -> Self {
            Self {
                entries,
                executions: Mutex::new(0),
            }
        }

        fn executions(&self) -> usize {
            *self.executions.lock().unwrap()
        }
    }

    #[async_trait]
    impl ToolRunner for FakeRunner {
        fn list_tools(&self) -> Vec<ToolSpec> {
            vec![ToolSpec {
                name: "web_scrape".into(),
                description: "fetch a page".into(),
                parameters_schema: serde_json::json!({"type": "object"}),
            }]
        }

        async fn execute_requested(
            &self,
            _response: &ChatResponse,
        ) -> Result<Vec<ChatMessage>> {
            *self.executions.lock().unwrap() += 1;
            Ok(self.entries.clone())
        }
    }

    fn text_response(text: &str) -> ChatResponse {
        ChatResponse {
            text: Some(text.to_string()),
            tool_calls: vec![],
        }
    }

    fn tool_response(name: &str) -> ChatResponse {
        ChatResponse {
            text: None,
            tool_calls: vec![ToolCall {
                id: "call_1".into(),
                name: name.into(),
                arguments: "{}".into(),
            }],
        }
    }

    #[tokio::test]
    async fn plain_answer_issues_exactly_two_requests() {
        let provider = Arc::new(FakeProvider::new(vec![
            text_response("draft"),
            text_response("Our return window is 30 days."),
        ]));
        let runner = Arc::new(FakeRunner::new(vec![]));
        let mut session =
            SupportSession::new(provider.clone(), runner.clone(), "be concise");

        let reply = session.ask("What is your return policy?").await.unwrap();

        assert_eq!(reply, "Our return window is 30 days.");
        assert_eq!(provider.calls(), 2);
        assert_eq!(runner.executions(), 0);

        let roles: Vec<&str> = session
            .transcript()
            .messages()
            .iter()
            .map(|m| m.role.as_str())
            .collect();
        assert_eq!(roles, vec!["user", "assistant"]);
    }

    #[tokio::test]
    async fn tool_calls_run_between_the_two_requests() {
        let provider = Arc::new(FakeProvider::new(vec![
            tool_response("web_scrape"),
            text_response("You can pair via Bluetooth 5.3."),
        ]));
        let runner = Arc::new(FakeRunner::new(vec![ChatMessage::tool_result(
            "call_1".into(),
            "faq text",
        )]));
        let mut session =
            SupportSession::new(provider.clone(), runner.clone(), "be concise");

        let reply = session.ask("How do I pair them?").await.unwrap();

        assert_eq!(reply, "You can pair via Bluetooth 5.3.");
        assert_eq!(provider.calls(), 2);
        assert_eq!(runner.executions(), 1);

        let counts = provider.seen_message_counts.lock().unwrap().clone();
        assert_eq!(counts, vec![1, 3]);

        let roles: Vec<&str> = session
            .transcript()
            .messages()
            .iter()
            .map(|m| m.role.as_str())
            .collect();
        assert_eq!(roles, vec!["user", "assistant", "tool", "assistant"]);
    }

    #[tokio::test]
    async fn system_prompt_is_byte_identical_across_requests() {
        let provider = Arc::new(FakeProvider::new(vec![
            text_response("a"),
            text_response("b"),
            text_response("c"),
            text_response("d"),
        ]));
        let runner = Arc::new(FakeRunner::new(vec![]));
        let prompt = "You only reply to questions after 6:00AM PDT.";
        let mut session = SupportSession::new(provider.clone(), runner, prompt);

        session.ask("first").await.unwrap();
        session.ask("second").await.unwrap();

        let systems = provider.seen_systems.lock().unwrap().clone();
        assert_eq!(systems.len(), 4);
        assert!(systems.iter().all(|s| s == prompt));
    }

    #[tokio::test]
    async fn transcript_grows_across_questions_without_loss() {
        let provider = Arc::new(FakeProvider::new(vec![
            text_response("x"),
            text_response("answer one"),
            text_response("y"),
            text_response("answer two"),
        ]));
        let runner = Arc::new(FakeRunner::new(vec![]));
        let mut session = SupportSession::new(provider.clone(), runner, "p");

        session.ask("q1").await.unwrap();
        session.ask("q2").await.unwrap();

        let contents: Vec<&str> = session
            .transcript()
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["q1", "answer one", "q2", "answer two"]);
    }

    #[tokio::test]
    async fn failed_tool_round_still_records_a_result_entry() {
        let provider = Arc::new(FakeProvider::new(vec![
            tool_response("missing_tool"),
            text_response("answer one"),
            text_response("draft"),
            text_response("answer two"),
        ]));
        let registry = Arc::new(crate::agent::ToolRegistry::new());
        let mut session = SupportSession::new(provider.clone(), registry, "p");

        session.ask("q1").await.unwrap();
        session.ask("q2").await.unwrap();

        let messages = session.transcript().messages();
        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(
            roles,
            vec!["user", "assistant", "tool", "assistant", "user", "assistant"]
        );
        assert_eq!(messages[2].tool_call_id.as_deref(), Some("call_1"));
        assert!(messages[2].content.contains("not found"));
    }

    #[tokio::test]
    async fn final_response_without_text_is_a_protocol_error() {
        let provider = Arc::new(FakeProvider::new(vec![
            text_response("draft"),
            ChatResponse {
                text: None,
                tool_calls: vec![],
            },
        ]));
        let runner = Arc::new(FakeRunner::new(vec![]));
        let mut session = SupportSession::new(provider, runner, "p");

        let err = session.ask("q").await.unwrap_err();
        assert!(matches!(err, AgentError::Protocol(_)));
    }
}
