//! Weather chat runtime: model backends, MCP tool hosts and query orchestration.
//!
//! # Overview
//!
//! The runtime is organized around these concepts:
//!
//! - **Backend**: A trait abstracting LLM providers. [`AnthropicBackend`]
//!   talks to the Anthropic Messages API.
//! - **ToolHost**: A trait for anything that advertises tools and executes
//!   calls. [`McpToolHost`] spawns an MCP server over stdio.
//! - **Orchestrator**: Sends a query with the host's tools to the backend,
//!   relays tool calls to the host, and asks the backend for a final answer.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{AnthropicBackend, McpToolHost, Orchestrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let backend = AnthropicBackend::builder("sk-ant-api01-...", "claude-sonnet-4-20250514").build();
//! let host = McpToolHost::spawn("weather-server", Vec::<String>::new()).await?;
//!
//! let mut orchestrator = Orchestrator::new(backend, host);
//! let answer = orchestrator.process_query("Any weather alerts in CA?").await?;
//! println!("{answer}");
//! orchestrator.host_mut().cleanup().await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod model;
mod orchestrator;
pub mod providers;
pub mod tools;

pub use error::{Error, Result};
pub use model::{Message, ModelError, Part, Role, ToolCall, ToolResult, ToolSpec};
pub use orchestrator::Orchestrator;
pub use providers::{AnthropicBackend, DEFAULT_MAX_TOKENS};
pub use tools::{McpError, McpToolHost, ToolError, ToolHost};
