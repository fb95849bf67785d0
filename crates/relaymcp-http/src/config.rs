//! Client configuration.

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::transport::protocol_version_value;

/// Protocol version advertised before negotiation
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

/// Endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/mcp";

/// Protocol client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// MCP endpoint URL (e.g., <http://localhost:8000/mcp>)
    pub endpoint: String,

    /// Protocol version advertised in `initialize` and used until negotiated
    pub protocol_version: String,

    /// `clientInfo.name` sent during the handshake
    pub client_name: String,

    /// `clientInfo.version` sent during the handshake
    pub client_version: String,

    /// User agent string (set to None to disable User-Agent header)
    pub user_agent: Option<String>,

    /// Bearer token forwarded as `Authorization` header
    pub auth_token: Option<String>,

    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,

    /// Per-request timeout. `None` leaves cancellation entirely to the caller.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            client_name: "relaymcp".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            user_agent: Some(format!("relaymcp/{}", env!("CARGO_PKG_VERSION"))),
            auth_token: None,
            headers: HashMap::new(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for `endpoint` with every other field defaulted
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Check the configuration before building a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an unparsable or
    /// non-HTTP endpoint, or a protocol version that is empty or not a valid
    /// header value.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            ClientError::InvalidArgument(format!("invalid endpoint '{}': {e}", self.endpoint))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidArgument(format!(
                "endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.protocol_version.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "protocol version must not be empty".to_string(),
            ));
        }
        protocol_version_value(&self.protocol_version)?;
        Ok(())
    }

    /// Build the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if reqwest rejects the settings.
    pub(crate) fn build_http_client(&self) -> ClientResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder();

        if let Some(ref user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {e}")))
    }
}
