//! Protocol client: handshake, tool calls and typed wrappers.
//!
//! ```text
//! ProtocolClient::initialize()
//!   1. POST initialize (default version, no session id)
//!   2. read Mcp-Session-Id header, decode result.protocolVersion
//!   3. POST notifications/initialized with the negotiated headers
//!   4. 202 Accepted -> commit session
//!
//! ProtocolClient::call_tool()
//!   POST tools/call (negotiated headers) -> decode -> ToolResult
//! ```

use std::future::Future;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::decode::decode_response;
use crate::error::{ClientError, ClientResult};
use crate::jsonrpc::{
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, METHOD_INITIALIZE, METHOD_INITIALIZED,
    METHOD_TOOLS_CALL,
};
use crate::session::{Session, SessionSnapshot};
use crate::tools::{CallToolParams, ToolOutput, ToolResult};
use crate::transport::{HttpExchange, protocol_version_value};

/// `clientInfo` sent during the handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name
    pub name: String,
    /// Client version
    pub version: String,
}

/// `serverInfo` returned by the handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams<'a> {
    protocol_version: &'a str,
    capabilities: Value,
    client_info: &'a ClientInfo,
}

/// Result of the `initialize` request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Version chosen by the server, if any
    #[serde(default)]
    pub protocol_version: Option<String>,
    /// Server capabilities
    #[serde(default)]
    pub capabilities: Option<Value>,
    /// Server identity
    #[serde(default)]
    pub server_info: Option<ServerInfo>,
    /// Free-form usage instructions
    #[serde(default)]
    pub instructions: Option<String>,
}

impl InitializeResult {
    fn negotiated_version(&self) -> Option<&str> {
        self.protocol_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Client for a single MCP endpoint.
///
/// All operations take `&self`; wrap the client in an `Arc` to share it
/// between tasks. Request ids stay unique across concurrent callers.
#[derive(Debug)]
pub struct ProtocolClient {
    exchange: HttpExchange,
    session: Session,
    client_info: ClientInfo,
}

impl ProtocolClient {
    /// Client over an existing HTTP client with default identity and
    /// protocol version.
    pub fn new(http: reqwest::Client, endpoint: &str) -> Self {
        let config = ClientConfig::new(endpoint);
        Self::with_http_client(http, &config)
    }

    /// Client over an existing HTTP client using `config` for everything
    /// except the HTTP client settings.
    pub fn with_http_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            exchange: HttpExchange::with_config(http, config),
            session: Session::new(config.protocol_version.clone()),
            client_info: ClientInfo {
                name: config.client_name.clone(),
                version: config.client_version.clone(),
            },
        }
    }

    /// Validate `config` and build a client with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for invalid configuration and
    /// [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let http = config.build_http_client()?;
        Ok(Self::with_http_client(http, &config))
    }

    /// Target endpoint URL
    pub fn endpoint(&self) -> &str {
        self.exchange.endpoint()
    }

    /// Negotiated protocol version, or the default before the handshake
    pub fn protocol_version(&self) -> String {
        self.session.protocol_version()
    }

    /// Session id assigned by the server, if any
    pub fn session_id(&self) -> Option<String> {
        self.session.session_id()
    }

    /// Whether [`initialize`](Self::initialize) has completed
    pub fn is_initialized(&self) -> bool {
        self.session.is_initialized()
    }

    /// Perform the initialize/initialized handshake.
    ///
    /// Session state is only committed once the server acknowledged the
    /// `notifications/initialized` message with `202 Accepted`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Transport`] on network failure or a non-2xx status
    /// - [`ClientError::Decode`] if the initialize reply cannot be decoded
    /// - [`ClientError::Rpc`] if the server rejects the request
    /// - [`ClientError::Handshake`] if the server negotiates a version that
    ///   cannot be sent as a header, the notification is not answered with
    ///   202, or the client is already initialized
    /// - [`ClientError::Cancelled`] if `ct` fires first
    #[instrument(skip(self, ct), fields(endpoint = %self.exchange.endpoint()))]
    pub async fn initialize(&self, ct: &CancellationToken) -> ClientResult<InitializeResult> {
        cancellable(ct, self.handshake()).await
    }

    async fn handshake(&self) -> ClientResult<InitializeResult> {
        if self.session.is_initialized() {
            return Err(ClientError::Handshake("already initialized".to_string()));
        }

        let pending = self.session.snapshot();
        let id = self.session.next_request_id();
        let params = InitializeParams {
            protocol_version: &pending.protocol_version,
            capabilities: json!({}),
            client_info: &self.client_info,
        };
        let request = JsonRpcRequest::new(id, METHOD_INITIALIZE, Some(to_params(&params)?));

        debug!(id, version = %pending.protocol_version, "Sending initialize");
        let raw = self.exchange.post(&request, &pending).await?;
        let session_id = raw.session_id();

        let result = into_result(decode_response(&raw.body)?)?;
        let init: InitializeResult = serde_json::from_value(result)
            .map_err(|e| ClientError::Decode(format!("invalid initialize result: {e}")))?;

        let negotiated = SessionSnapshot {
            protocol_version: init
                .negotiated_version()
                .map_or(pending.protocol_version.clone(), ToString::to_string),
            session_id,
        };
        if protocol_version_value(&negotiated.protocol_version).is_err() {
            return Err(ClientError::Handshake(format!(
                "server negotiated unusable protocol version {:?}",
                negotiated.protocol_version
            )));
        }

        let notification = JsonRpcNotification::new(METHOD_INITIALIZED);
        let ack = self.exchange.post(&notification, &negotiated).await?;
        if ack.status != StatusCode::ACCEPTED {
            warn!(status = %ack.status, "Server did not accept initialized notification");
            return Err(ClientError::Handshake(format!(
                "initialized notification returned {} (expected 202 Accepted)",
                ack.status
            )));
        }

        info!(
            version = %negotiated.protocol_version,
            session_id = negotiated.session_id().unwrap_or("<none>"),
            "MCP session initialized"
        );
        self.session.commit(negotiated)?;
        Ok(init)
    }

    /// Invoke tool `name` with `arguments`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidArgument`] for an empty tool name
    /// - [`ClientError::NotInitialized`] before the handshake
    /// - [`ClientError::Transport`], [`ClientError::Decode`],
    ///   [`ClientError::Rpc`] for exchange failures
    /// - [`ClientError::ResultShape`] / [`ClientError::ToolFailed`] for
    ///   unusable tool results
    /// - [`ClientError::Cancelled`] if `ct` fires first
    #[instrument(skip(self, arguments, ct), fields(tool = %name))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        ct: &CancellationToken,
    ) -> ClientResult<ToolResult> {
        cancellable(ct, self.call_tool_inner(name, arguments)).await
    }

    async fn call_tool_inner(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> ClientResult<ToolResult> {
        if name.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "tool name must not be empty".to_string(),
            ));
        }
        let session = self.session.ready_snapshot()?;
        let id = self.session.next_request_id();

        let params = CallToolParams {
            name: name.to_string(),
            arguments,
        };
        let request = JsonRpcRequest::new(id, METHOD_TOOLS_CALL, Some(to_params(&params)?));

        debug!(id, "Calling tool");
        let raw = self.exchange.post(&request, &session).await?;
        let result = into_result(decode_response(&raw.body)?)?;
        ToolResult::from_result(result)
    }

    /// Invoke tool `name` with any arguments serializing to a JSON object.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidArgument`] if `arguments` is not an object,
    /// otherwise as [`call_tool`](Self::call_tool).
    pub async fn call_tool_with<A>(
        &self,
        name: &str,
        arguments: &A,
        ct: &CancellationToken,
    ) -> ClientResult<ToolResult>
    where
        A: Serialize + ?Sized,
    {
        let arguments = match serde_json::to_value(arguments)
            .map_err(|e| ClientError::InvalidArgument(format!("unserializable arguments: {e}")))?
        {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ClientError::InvalidArgument(format!(
                    "tool arguments must be a JSON object, got {other}"
                )));
            }
        };
        self.call_tool(name, arguments, ct).await
    }

    /// Invoke a tool and coerce its output leniently, see [`ToolOutput`].
    ///
    /// # Errors
    ///
    /// As [`call_tool_with`](Self::call_tool_with); coercion itself never fails.
    pub async fn call_tool_as<T, A>(
        &self,
        name: &str,
        arguments: &A,
        ct: &CancellationToken,
    ) -> ClientResult<T>
    where
        T: ToolOutput,
        A: Serialize + ?Sized,
    {
        Ok(self.call_tool_with(name, arguments, ct).await?.coerce())
    }

    /// Call the `add` tool. Unparsable results become `0`.
    ///
    /// # Errors
    ///
    /// As [`call_tool`](Self::call_tool).
    pub async fn add(&self, a: i64, b: i64, ct: &CancellationToken) -> ClientResult<i64> {
        self.call_tool_as("add", &json!({ "a": a, "b": b }), ct)
            .await
    }

    /// Call the `get_time` tool for IANA zone `tz`. Non-string results
    /// become `""`.
    ///
    /// # Errors
    ///
    /// As [`call_tool`](Self::call_tool).
    pub async fn get_time(&self, tz: &str, ct: &CancellationToken) -> ClientResult<String> {
        self.call_tool_as("get_time", &json!({ "tz": tz }), ct).await
    }
}

/// Race `operation` against the caller's token. Dropping the operation
/// aborts the in-flight request.
async fn cancellable<T, F>(ct: &CancellationToken, operation: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    tokio::select! {
        biased;
        () = ct.cancelled() => {
            debug!("Operation cancelled by caller");
            Err(ClientError::Cancelled)
        }
        result = operation => result,
    }
}

fn to_params<P: Serialize>(params: &P) -> ClientResult<Value> {
    serde_json::to_value(params)
        .map_err(|e| ClientError::InvalidArgument(format!("failed to serialize params: {e}")))
}

fn into_result(response: JsonRpcResponse) -> ClientResult<Value> {
    if let Some(error) = response.error {
        return Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    response.result.ok_or_else(|| {
        ClientError::Decode("response carries neither result nor error".to_string())
    })
}
