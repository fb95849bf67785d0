//! Client error types.

use thiserror::Error;

/// A specialized `Result` type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Maximum number of body characters carried in a decode error.
pub const BODY_EXCERPT_CHARS: usize = 200;

/// Errors surfaced by [`ProtocolClient`](crate::ProtocolClient).
///
/// Every variant propagates to the immediate caller; the client never
/// retries or recovers locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClientError {
    /// The HTTP exchange failed or returned a non-success status.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The response body could not be turned into a JSON-RPC document.
    #[error("Decode failure: {0}")]
    Decode(String),

    /// The response was well formed but carried no usable tool result.
    #[error("Unexpected tool result shape: {0}")]
    ResultShape(String),

    /// The initialize/initialized handshake did not complete.
    #[error("Handshake failure: {0}")]
    Handshake(String),

    /// A tool call was attempted before the handshake completed.
    #[error("Client not initialized - call initialize() first")]
    NotInitialized,

    /// The server answered with a JSON-RPC error object.
    #[error("Server error [{code}]: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Server supplied message
        message: String,
    },

    /// The tool ran but reported `isError: true`.
    #[error("Tool failed: {0}")]
    ToolFailed(String),

    /// The caller supplied something the client cannot send.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller's cancellation token fired before the operation finished.
    #[error("Operation cancelled")]
    Cancelled,
}

impl ClientError {
    /// Build a decode error that quotes a bounded prefix of `body`.
    pub fn undecodable_body(body: &str) -> Self {
        let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        Self::Decode(format!("no JSON payload in response body: {excerpt}"))
    }

    /// Whether this error came from the caller's cancellation token.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undecodable_body_is_bounded() {
        let body = format!("garbage{}", "x".repeat(500));
        let err = ClientError::undecodable_body(&body);
        let ClientError::Decode(msg) = &err else {
            panic!("expected decode error, got {err:?}");
        };
        assert!(msg.ends_with(&body[..BODY_EXCERPT_CHARS]));
        assert!(!msg.contains(&body[..BODY_EXCERPT_CHARS + 1]));
    }

    #[test]
    fn test_undecodable_body_respects_char_boundaries() {
        let body = "ü".repeat(300);
        let err = ClientError::undecodable_body(&body);
        assert!(err.to_string().contains(&"ü".repeat(BODY_EXCERPT_CHARS)));
        assert!(!err.to_string().contains(&"ü".repeat(BODY_EXCERPT_CHARS + 1)));
    }

    #[test]
    fn test_rpc_display() {
        let err = ClientError::Rpc {
            code: -32601,
            message: "method not found".to_string(),
        };
        assert_eq!(err.to_string(), "Server error [-32601]: method not found");
    }
}
