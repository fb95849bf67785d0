//! CLI error types

use relaymcp_http::ClientError;
use thiserror::Error;

/// Errors reported by the command-line front end
#[derive(Error, Debug)]
pub enum CliError {
    /// The MCP client failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// JSON formatting or parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Hints printed below the error message
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Client(ClientError::Transport(_)) => vec![
                "Check if the server is running",
                "Verify the endpoint URL (--url or MCP_URL)",
            ],
            Self::Client(ClientError::Handshake(_)) => vec![
                "Check that the server speaks the Streamable HTTP transport",
                "Try pinning --protocol-version to a version the server supports",
            ],
            Self::InvalidArguments(_) => vec![
                "Tool arguments must be a JSON object, e.g. '{\"a\": 1}'",
                "Use --help to see expected format",
            ],
            _ => vec![],
        }
    }

    /// Whether the error came from Ctrl-C
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Client(err) if err.is_cancelled())
    }
}

/// Result alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;
