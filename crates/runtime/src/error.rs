use crate::model::ModelError;
use crate::tools::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to connect to tool server: {0}")]
    Connect(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("tool call {name} failed: {source}")]
    Tool {
        name: String,
        #[source]
        source: ToolError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
