//! JSON-RPC 2.0 envelopes used on the wire.
//!
//! Requests and notifications are only ever serialized by this crate, so they
//! carry a strict [`JsonRpcVersion`] marker. Responses are parsed leniently:
//! servers in the wild omit `jsonrpc` or `id` on single-shot HTTP replies and
//! the client only needs `result` or `error`.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// JSON-RPC protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// Method name of the handshake request
pub const METHOD_INITIALIZE: &str = "initialize";

/// Method name of the handshake-complete notification
pub const METHOD_INITIALIZED: &str = "notifications/initialized";

/// Method name for tool invocation
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// Serializes as the literal `"2.0"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

/// JSON-RPC request message (expects a reply)
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version
    pub jsonrpc: JsonRpcVersion,
    /// Request identifier
    pub id: u64,
    /// Request method name
    pub method: String,
    /// Request parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Create a request with the given id
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC notification (fire-and-forget, no `id`)
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    /// JSON-RPC version
    pub jsonrpc: JsonRpcVersion,
    /// Notification method name
    pub method: String,
    /// Notification parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Create a notification without parameters
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            method: method.into(),
            params: None,
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// JSON-RPC response message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version, if the server sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    /// Request identifier echoed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Successful result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let req = JsonRpcRequest::new(
            7,
            METHOD_TOOLS_CALL,
            Some(json!({"name": "add", "arguments": {"a": 1, "b": 2}})),
        );
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "tools/call",
                "params": {"name": "add", "arguments": {"a": 1, "b": 2}}
            })
        );
    }

    #[test]
    fn test_notification_has_no_id() {
        let notif = JsonRpcNotification::new(METHOD_INITIALIZED);
        let value = serde_json::to_value(&notif).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"})
        );
        assert!(value.get("id").is_none());
        assert!(value.get("params").is_none());
    }

    #[test]
    fn test_response_parses_without_envelope_fields() {
        let resp: JsonRpcResponse =
            serde_json::from_str(r#"{"result":{"structuredContent":{"result":5}}}"#).unwrap();
        assert!(resp.jsonrpc.is_none());
        assert!(resp.id.is_none());
        assert_eq!(resp.result, Some(json!({"structuredContent": {"result": 5}})));
    }

    #[test]
    fn test_response_parses_error() {
        let resp: JsonRpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32602,"message":"invalid params"}}"#,
        )
        .unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32602);
        assert_eq!(err.message, "invalid params");
        assert!(err.data.is_none());
    }
}
