//! Tool call payloads and result extraction.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};

/// `tools/call` request parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallToolParams {
    /// Tool name
    pub name: String,
    /// Tool arguments
    pub arguments: Map<String, Value>,
}

/// Decoded tool output.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    /// `result.structuredContent.result`
    Structured(Value),
    /// `result.content[0].text`, left for the caller to coerce
    Text(String),
}

impl ToolResult {
    /// Pick the tool output out of a `tools/call` result.
    ///
    /// The structured value wins over the first content block, and
    /// `content` is not looked at when it is present. Content blocks are
    /// read leniently: anything other than a `text` block with a string
    /// payload is skipped.
    ///
    /// # Errors
    ///
    /// [`ClientError::ToolFailed`] when the result is flagged `isError`,
    /// [`ClientError::ResultShape`] when neither shape is present.
    pub fn from_result(result: Value) -> ClientResult<Self> {
        let mut result = match result {
            Value::Object(map) => map,
            other => {
                return Err(ClientError::ResultShape(format!(
                    "tool result must be a JSON object, got {other}"
                )));
            }
        };

        if result.get("isError").and_then(Value::as_bool) == Some(true) {
            let message = content_texts(&result)
                .next()
                .unwrap_or("tool reported an error")
                .to_string();
            return Err(ClientError::ToolFailed(message));
        }

        if let Some(value) = result
            .get_mut("structuredContent")
            .and_then(Value::as_object_mut)
            .and_then(|sc| sc.remove("result"))
        {
            return Ok(Self::Structured(value));
        }

        result
            .get("content")
            .and_then(|content| content.get(0))
            .and_then(text_of)
            .map(|text| Self::Text(text.to_string()))
            .ok_or_else(|| {
                ClientError::ResultShape(
                    "neither structuredContent.result nor content[0].text present".to_string(),
                )
            })
    }

    /// Coerce into a caller type, see [`ToolOutput`].
    pub fn coerce<T: ToolOutput>(self) -> T {
        T::from_tool_result(self)
    }

    /// Render the result as JSON, text results becoming JSON strings
    pub fn into_value(self) -> Value {
        match self {
            Self::Structured(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// Lenient conversion from a [`ToolResult`].
///
/// Conversions never fail: a value of the wrong type maps to the type's
/// zero value (`0`, `""`).
pub trait ToolOutput: Sized {
    /// Convert, falling back to the zero value
    fn from_tool_result(result: ToolResult) -> Self;
}

impl ToolOutput for i64 {
    fn from_tool_result(result: ToolResult) -> Self {
        match result {
            ToolResult::Structured(value) => match value {
                Value::Number(n) => n.as_i64().unwrap_or(0),
                Value::String(s) => s.trim().parse().unwrap_or(0),
                _ => 0,
            },
            ToolResult::Text(text) => text.trim().parse().unwrap_or(0),
        }
    }
}

impl ToolOutput for String {
    fn from_tool_result(result: ToolResult) -> Self {
        match result {
            ToolResult::Structured(Value::String(s)) | ToolResult::Text(s) => s,
            ToolResult::Structured(_) => String::new(),
        }
    }
}

impl ToolOutput for Value {
    fn from_tool_result(result: ToolResult) -> Self {
        result.into_value()
    }
}

/// Text payload of a content block, if it is a text block.
fn text_of(block: &Value) -> Option<&str> {
    match block.get("type").and_then(Value::as_str) {
        None | Some("text") => block.get("text").and_then(Value::as_str),
        Some(_) => None,
    }
}

fn content_texts(result: &Map<String, Value>) -> impl Iterator<Item = &str> {
    result
        .get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(text_of)
}
