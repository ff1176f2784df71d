//! LLM provider backends.

mod anthropic;

pub use anthropic::{AnthropicBackend, AnthropicBackendBuilder, DEFAULT_MAX_TOKENS};
