//! Query orchestration between the model and a tool host.

use crate::model::{Backend, Message, ModelRequest, ToolResult};
use crate::tools::ToolHost;
use crate::{Error, Result};
use tracing::{debug, info};

/// Runs one query through the model, relaying any tool calls to the host.
///
/// Each query starts from an empty history. At most two round trips are made:
/// one with the tool list, and, if the model asked for tools, one more with the
/// tool results and no tool list.
pub struct Orchestrator<B, H> {
    backend: B,
    host: H,
}

impl<B: Backend, H: ToolHost> Orchestrator<B, H> {
    pub fn new(backend: B, host: H) -> Self {
        Self { backend, host }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Answer `query`, returning every text segment joined by newlines.
    ///
    /// Segments are, in order: round-one text, one trace line per tool call,
    /// then round-two text. The first failing tool call fails the whole query.
    pub async fn process_query(&self, query: &str) -> Result<String> {
        let mut messages = vec![Message::user(query)];
        let mut final_text: Vec<String> = Vec::new();

        let response = self
            .backend
            .call(ModelRequest {
                messages: &messages,
                tools: self.host.specs(),
            })
            .await?;

        final_text.extend(response.message.texts().into_iter().map(str::to_string));

        let tool_calls = response.message.tool_calls();
        if tool_calls.is_empty() {
            return Ok(final_text.join("\n"));
        }

        messages.push(response.message);

        let mut results = Vec::with_capacity(tool_calls.len());
        for call in &tool_calls {
            let args = serde_json::to_string(&call.input).unwrap_or_else(|_| "{}".to_string());
            final_text.push(format!("[Calling tool {} with args {args}]", call.name));

            info!(tool = %call.name, id = %call.id, "calling tool");
            let output = self
                .host
                .execute(call)
                .await
                .map_err(|source| Error::Tool {
                    name: call.name.clone(),
                    source,
                })?;
            debug!(tool = %call.name, "tool call complete");

            results.push(ToolResult::success(call.id.clone(), output));
        }

        messages.push(Message::tool_results(results));

        let response = self
            .backend
            .call(ModelRequest {
                messages: &messages,
                tools: &[],
            })
            .await?;

        final_text.extend(response.message.texts().into_iter().map(str::to_string));

        Ok(final_text.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelError, ModelResponse, Part, Role, ToolCall, ToolSpec, Usage};
    use crate::tools::{EmptyToolHost, ToolError};
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every request it sees.
    #[derive(Default)]
    struct ScriptedBackend {
        responses: Mutex<VecDeque<Message>>,
        seen: Mutex<Vec<(Vec<Message>, Vec<ToolSpec>)>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Message>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::default(),
            }
        }

        fn round_trips(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl Backend for ScriptedBackend {
        async fn call(&self, request: ModelRequest<'_>) -> std::result::Result<ModelResponse, ModelError> {
            self.seen
                .lock()
                .unwrap()
                .push((request.messages.to_vec(), request.tools.to_vec()));
            let message = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ModelError::Api("no scripted response left".into()))?;
            Ok(ModelResponse {
                message,
                usage: Usage::default(),
            })
        }
    }

    /// Echoes calls back as results, failing on a chosen tool name.
    struct RecordingHost {
        specs: Vec<ToolSpec>,
        fail_on: Option<&'static str>,
        calls: Mutex<Vec<ToolCall>>,
    }

    impl RecordingHost {
        fn new() -> Self {
            Self {
                specs: vec![
                    ToolSpec {
                        name: "get_forecast".into(),
                        description: "Get weather forecast for a location".into(),
                        schema: json!({"type": "object"}),
                    },
                    ToolSpec {
                        name: "get_alerts".into(),
                        description: "Get weather alerts for a US state".into(),
                        schema: json!({"type": "object"}),
                    },
                ],
                fail_on: None,
                calls: Mutex::default(),
            }
        }

        fn failing_on(name: &'static str) -> Self {
            Self {
                fail_on: Some(name),
                ..Self::new()
            }
        }

        fn call_names(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|c| c.name.clone()).collect()
        }
    }

    impl ToolHost for RecordingHost {
        fn specs(&self) -> &[ToolSpec] {
            &self.specs
        }

        async fn execute(&self, call: &ToolCall) -> std::result::Result<Value, ToolError> {
            self.calls.lock().unwrap().push(call.clone());
            if self.fail_on == Some(call.name.as_str()) {
                return Err(ToolError::Execution("server went away".into()));
            }
            Ok(json!({"content": [{"type": "text", "text": format!("result of {}", call.id)}]}))
        }
    }

    fn assistant(parts: Vec<Part>) -> Message {
        Message {
            role: Role::Assistant,
            parts,
        }
    }

    fn tool_use(id: &str, name: &str, input: Value) -> Part {
        Part::ToolCall(ToolCall {
            id: id.into(),
            name: name.into(),
            input,
        })
    }

    #[tokio::test]
    async fn text_only_response_takes_one_round_trip() {
        let backend = ScriptedBackend::new(vec![assistant(vec![
            Part::Text("Hello".into()),
            Part::Text("there".into()),
        ])]);
        let orchestrator = Orchestrator::new(backend, RecordingHost::new());

        let answer = orchestrator.process_query("hi").await.unwrap();

        assert_eq!(answer, "Hello\nthere");
        assert_eq!(orchestrator.backend.round_trips(), 1);
        assert!(orchestrator.host().call_names().is_empty());
    }

    #[tokio::test]
    async fn first_round_carries_query_and_all_tools() {
        let backend = ScriptedBackend::new(vec![Message::assistant("ok")]);
        let orchestrator = Orchestrator::new(backend, RecordingHost::new());

        orchestrator.process_query("Weather in Sacramento?").await.unwrap();

        let seen = orchestrator.backend.seen.lock().unwrap();
        let (messages, tools) = &seen[0];
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "Weather in Sacramento?");
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["get_forecast", "get_alerts"]);
    }

    #[tokio::test]
    async fn tool_calls_run_in_order_with_one_follow_up() {
        let backend = ScriptedBackend::new(vec![
            assistant(vec![
                Part::Text("Let me check.".into()),
                tool_use("toolu_1", "get_forecast", json!({"latitude": 38.58, "longitude": -121.49})),
                tool_use("toolu_2", "get_alerts", json!({"state": "CA"})),
                tool_use("toolu_3", "get_alerts", json!({"state": "NV"})),
            ]),
            Message::assistant("Sunny, no alerts."),
        ]);
        let orchestrator = Orchestrator::new(backend, RecordingHost::new());

        let answer = orchestrator.process_query("Weather?").await.unwrap();

        assert_eq!(
            orchestrator.host().call_names(),
            vec!["get_forecast", "get_alerts", "get_alerts"]
        );
        assert_eq!(orchestrator.backend.round_trips(), 2);
        assert_eq!(
            answer,
            "Let me check.\n\
             [Calling tool get_forecast with args {\"latitude\":38.58,\"longitude\":-121.49}]\n\
             [Calling tool get_alerts with args {\"state\":\"CA\"}]\n\
             [Calling tool get_alerts with args {\"state\":\"NV\"}]\n\
             Sunny, no alerts."
        );
    }

    #[tokio::test]
    async fn second_round_has_history_results_and_no_tools() {
        let backend = ScriptedBackend::new(vec![
            assistant(vec![
                tool_use("toolu_a", "get_alerts", json!({"state": "CA"})),
                tool_use("toolu_b", "get_forecast", json!({"latitude": 1.0, "longitude": 2.0})),
            ]),
            Message::assistant("done"),
        ]);
        let orchestrator = Orchestrator::new(backend, RecordingHost::new());

        orchestrator.process_query("q").await.unwrap();

        let seen = orchestrator.backend.seen.lock().unwrap();
        let (messages, tools) = &seen[1];
        assert!(tools.is_empty());
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].tool_calls().len(), 2);
        assert_eq!(messages[2].role, Role::User);

        let results: Vec<_> = messages[2]
            .parts
            .iter()
            .map(|p| match p {
                Part::ToolResult(ToolResult::Success {
                    tool_call_id,
                    output,
                }) => (tool_call_id.clone(), output.clone()),
                other => panic!("unexpected part {other:?}"),
            })
            .collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "toolu_a");
        assert_eq!(results[0].1["content"][0]["text"], "result of toolu_a");
        assert_eq!(results[1].0, "toolu_b");
    }

    #[tokio::test]
    async fn failing_tool_aborts_before_second_round() {
        let backend = ScriptedBackend::new(vec![
            assistant(vec![
                tool_use("toolu_1", "get_alerts", json!({"state": "CA"})),
                tool_use("toolu_2", "get_forecast", json!({"latitude": 1.0, "longitude": 2.0})),
                tool_use("toolu_3", "get_alerts", json!({"state": "NY"})),
            ]),
            Message::assistant("never sent"),
        ]);
        let orchestrator =
            Orchestrator::new(backend, RecordingHost::failing_on("get_forecast"));

        let err = orchestrator.process_query("q").await.unwrap_err();

        match err {
            Error::Tool { name, .. } => assert_eq!(name, "get_forecast"),
            other => panic!("expected tool error, got {other:?}"),
        }
        assert_eq!(orchestrator.backend.round_trips(), 1);
        assert_eq!(
            orchestrator.host().call_names(),
            vec!["get_alerts", "get_forecast"]
        );
    }

    #[tokio::test]
    async fn model_failure_surfaces_as_error() {
        let backend = ScriptedBackend::new(Vec::new());
        let orchestrator = Orchestrator::new(backend, EmptyToolHost);

        let err = orchestrator.process_query("q").await.unwrap_err();
        assert!(matches!(err, Error::Model(ModelError::Api(_))));
    }

    #[tokio::test]
    async fn empty_host_sends_no_tools() {
        let backend = ScriptedBackend::new(vec![Message::assistant("plain chat")]);
        let orchestrator = Orchestrator::new(backend, EmptyToolHost);

        let answer = orchestrator.process_query("hello").await.unwrap();

        assert_eq!(answer, "plain chat");
        assert!(orchestrator.backend.seen.lock().unwrap()[0].1.is_empty());
    }
}
