//! MCP (Model Context Protocol) client integration.
//!
//! This module provides MCP server management using the official rmcp SDK.
//!
//! # Example
//!
//! ```ignore
//! use runtime::tools::McpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = McpClient::spawn("weather-server", Vec::<String>::new()).await?;
//!
//! let tools = client.list_tools().await?;
//! for tool in &tools {
//!     println!("Tool: {}", tool.name);
//! }
//! client.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub use rmcp::model::{CallToolResult, Tool};
use rmcp::{
    ServiceExt,
    model::CallToolRequestParams,
    service::{RoleClient, RunningService},
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use serde_json::Value;
use tokio::process::Command;

use crate::model::ToolSpec;

/// Error type for MCP operations.
pub type McpError = Box<dyn std::error::Error + Send + Sync>;

/// An MCP client connected to a server process.
pub struct McpClient {
    service: RunningService<RoleClient, ()>,
}

impl McpClient {
    /// Spawn an MCP server and connect to it.
    ///
    /// # Arguments
    ///
    /// * `command` - The command to run (e.g., "weather-server")
    /// * `args` - Arguments to pass to the command
    pub async fn spawn(
        command: impl AsRef<str>,
        args: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, McpError> {
        let command_str = command.as_ref().to_string();
        let args_vec: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();

        let transport = TokioChildProcess::new(Command::new(&command_str).configure(|cmd| {
            for arg in &args_vec {
                cmd.arg(arg);
            }
        }))
        .map_err(|e| format!("failed to spawn {command_str}: {e}"))?;

        let service = ().serve(transport).await?;

        Ok(Self { service })
    }

    /// List every tool the server advertises, following pagination.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        let tools = self.service.list_all_tools().await?;
        Ok(tools)
    }

    /// Call a tool with the given name and arguments.
    pub async fn call_tool(
        &self,
        name: impl Into<String>,
        arguments: Option<serde_json::Map<String, Value>>,
    ) -> Result<CallToolResult, McpError> {
        let params = CallToolRequestParams {
            name: name.into().into(),
            arguments,
            meta: None,
            task: None,
        };

        let result = self.service.call_tool(params).await?;
        Ok(result)
    }

    /// Close the session and terminate the server process.
    pub async fn shutdown(self) -> Result<(), McpError> {
        self.service.cancel().await?;
        Ok(())
    }
}

impl From<Tool> for ToolSpec {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool.description.map(|d| d.to_string()).unwrap_or_default(),
            schema: Value::Object(tool.input_schema.as_ref().clone()),
        }
    }
}
