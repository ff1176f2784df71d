//! MCP-backed tool host.

use super::{McpClient, McpError, ToolError, ToolHost};
use crate::model::{ToolCall, ToolSpec};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Arguments in the shape MCP `tools/call` expects.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments(pub Option<Map<String, Value>>);

impl TryFrom<Value> for ToolArguments {
    type Error = ToolError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(Some(map))),
            Value::Null => Ok(Self(None)),
            other => Err(ToolError::InvalidInput(format!(
                "tool arguments must be a JSON object, got {other}"
            ))),
        }
    }
}

/// Tool host backed by an MCP server.
pub struct McpToolHost {
    client: Option<McpClient>,
    specs: Vec<ToolSpec>,
}

impl McpToolHost {
    /// Spawn MCP server and cache tool specs.
    pub async fn spawn(
        command: impl AsRef<str>,
        args: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, McpError> {
        let client = McpClient::spawn(command, args).await?;
        let specs: Vec<ToolSpec> = client
            .list_tools()
            .await
            .map_err(|e| format!("unable to list tools from server: {e}"))?
            .into_iter()
            .map(ToolSpec::from)
            .collect();
        info!(tools = specs.len(), "connected to MCP server");
        Ok(Self {
            client: Some(client),
            specs,
        })
    }

    /// Names of the advertised tools, in server order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.name.as_str()).collect()
    }

    /// Close the session. Calling this again is a no-op.
    pub async fn cleanup(&mut self) -> Result<(), McpError> {
        if let Some(client) = self.client.take() {
            debug!("closing MCP session");
            client.shutdown().await?;
        }
        Ok(())
    }
}

impl ToolHost for McpToolHost {
    fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ToolError::Execution("MCP session is closed".into()))?;

        let arguments = ToolArguments::try_from(call.input.clone())?;
        let result = client
            .call_tool(&call.name, arguments.0)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        serde_json::to_value(&result)
            .map_err(|e| ToolError::Execution(format!("serialize result: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_input_becomes_arguments() {
        let args = ToolArguments::try_from(json!({"state": "CA"})).unwrap();
        let map = args.0.unwrap();
        assert_eq!(map.get("state"), Some(&json!("CA")));
    }

    #[test]
    fn null_input_means_no_arguments() {
        let args = ToolArguments::try_from(Value::Null).unwrap();
        assert!(args.0.is_none());
    }

    #[test]
    fn scalar_input_is_rejected() {
        let err = ToolArguments::try_from(json!("CA")).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn closed_host_refuses_calls() {
        let mut host = McpToolHost {
            client: None,
            specs: Vec::new(),
        };
        host.cleanup().await.unwrap();
        host.cleanup().await.unwrap();

        let call = ToolCall {
            id: "toolu_1".into(),
            name: "get_alerts".into(),
            input: json!({"state": "CA"}),
        };
        let err = host.execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::Execution(_)));
    }

    #[tokio::test]
    async fn spawn_fails_for_missing_executable() {
        let result =
            McpToolHost::spawn("definitely-not-a-weather-server-binary", Vec::<String>::new())
                .await;
        assert!(result.is_err());
    }
}
