use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Malformed arguments for tool {tool}: {reason}")]
    MalformedToolArguments { tool: String, reason: String },

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    #[error("Invalid tool name: {0}")]
    InvalidToolName(String),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    /// Transport, auth and API failures reported by the model provider
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

pub type AgentResult<T> = Result<T, AgentError>;
