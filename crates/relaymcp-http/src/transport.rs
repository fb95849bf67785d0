//! HTTP exchange with the MCP endpoint.
//!
//! One POST per JSON-RPC message. Protocol headers come from the caller's
//! [`SessionSnapshot`]; static headers (authorization, user-configured extras)
//! are resolved once at construction.

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionSnapshot;

/// Protocol version request header
pub const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

/// Session id request/response header
pub const SESSION_ID_HEADER: &str = "mcp-session-id";

/// Accept value: the server may answer with plain JSON or an event stream
pub const ACCEPT_JSON_OR_SSE: &str = "application/json, text/event-stream";

/// A completed HTTP exchange with a success status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status (always 2xx)
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body text, JSON or event-stream framed
    pub body: String,
}

impl RawResponse {
    /// `Mcp-Session-Id` response header, if present and non-empty
    pub fn session_id(&self) -> Option<String> {
        self.headers
            .get(SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|sid| !sid.is_empty())
            .map(ToString::to_string)
    }
}

/// POSTs JSON-RPC messages to a single endpoint.
#[derive(Clone)]
pub struct HttpExchange {
    http: HttpClient,
    endpoint: String,
    static_headers: HeaderMap,
}

impl std::fmt::Debug for HttpExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExchange")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpExchange {
    /// Exchange over `http` targeting `endpoint` (trailing slashes stripped)
    pub fn new(http: HttpClient, endpoint: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            static_headers: HeaderMap::new(),
        }
    }

    /// Exchange carrying the authorization and extra headers of `config`.
    ///
    /// Headers that are not valid HTTP header names or values are skipped
    /// with a warning.
    pub fn with_config(http: HttpClient, config: &ClientConfig) -> Self {
        let mut exchange = Self::new(http, &config.endpoint);

        if let Some(token) = &config.auth_token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    exchange.static_headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("Auth token is not a valid header value, skipping"),
            }
        }

        for (key, value) in &config.headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(k), Ok(v)) => {
                    exchange.static_headers.insert(k, v);
                }
                _ => warn!(header = %key, "Invalid custom header, skipping"),
            }
        }

        exchange
    }

    /// Target endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_headers(&self, session: &SessionSnapshot) -> ClientResult<HeaderMap> {
        let mut headers = self.static_headers.clone();

        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_JSON_OR_SSE));
        headers.insert(
            HeaderName::from_static(PROTOCOL_VERSION_HEADER),
            protocol_version_value(&session.protocol_version)?,
        );

        if let Some(sid) = session.session_id()
            && let Ok(session_value) = HeaderValue::from_str(sid)
        {
            headers.insert(HeaderName::from_static(SESSION_ID_HEADER), session_value);
        }

        Ok(headers)
    }

    /// POST `message` and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the request cannot be sent, the
    /// body cannot be read, or the status is not 2xx.
    pub async fn post<M: Serialize + ?Sized>(
        &self,
        message: &M,
        session: &SessionSnapshot,
    ) -> ClientResult<RawResponse> {
        let headers = self.build_headers(session)?;

        let response = self
            .http
            .post(&self.endpoint)
            .headers(headers)
            .json(message)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("POST {} failed: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!(
                "POST {} returned {status}",
                self.endpoint
            )));
        }

        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("failed to read response body: {e}")))?;

        debug!(status = status.as_u16(), bytes = body.len(), "MCP POST completed");
        trace!(body = %body, "MCP response body");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// `MCP-Protocol-Version` value for `version`.
///
/// # Errors
///
/// Returns [`ClientError::InvalidArgument`] if `version` cannot be sent as a
/// header value.
pub fn protocol_version_value(version: &str) -> ClientResult<HeaderValue> {
    HeaderValue::from_str(version).map_err(|_| {
        ClientError::InvalidArgument(format!(
            "protocol version {version:?} is not a valid header value"
        ))
    })
}
