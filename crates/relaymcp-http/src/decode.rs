//! Response body normalization.
//!
//! Streamable HTTP servers answer a POST either with `application/json` or
//! with a `text/event-stream` body holding a single event:
//!
//! ```text
//! event: message
//! data: {"jsonrpc":"2.0","id":1,"result":{...}}
//!
//! ```
//!
//! Both shapes go through [`extract_payload`] so every call path (handshake,
//! notification, tool calls) parses responses the same way. The content type
//! header is not consulted; the body itself decides.

use crate::error::{ClientError, ClientResult};
use crate::jsonrpc::JsonRpcResponse;

/// Extract the JSON document from a raw response body.
///
/// A body that starts with `{` (after leading whitespace) is returned as-is.
/// Anything else is scanned line by line for the first `data:` field with a
/// non-empty payload, which is returned trimmed.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] quoting at most the first
/// [`BODY_EXCERPT_CHARS`](crate::error::BODY_EXCERPT_CHARS) characters of the
/// body when neither form matches.
pub fn extract_payload(body: &str) -> ClientResult<&str> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .find(|payload| !payload.is_empty())
        .ok_or_else(|| ClientError::undecodable_body(body))
}

/// Extract and parse a JSON-RPC response from a raw response body.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] if no payload can be extracted or the
/// payload is not a valid JSON-RPC response object.
pub fn decode_response(body: &str) -> ClientResult<JsonRpcResponse> {
    let payload = extract_payload(body)?;
    serde_json::from_str(payload)
        .map_err(|e| ClientError::Decode(format!("invalid JSON-RPC response: {e}")))
}
