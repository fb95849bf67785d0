//! # relaymcp HTTP client
//!
//! Client for MCP tool servers speaking JSON-RPC over the Streamable HTTP
//! transport.
//!
//! ## Features
//!
//! - **Session Handshake**: `initialize` / `notifications/initialized` with
//!   protocol version negotiation and `Mcp-Session-Id` tracking
//! - **Dual Response Encoding**: plain `application/json` bodies and
//!   single-event `text/event-stream` bodies decode identically
//! - **Typed Tool Calls**: structured results preferred over text content,
//!   lenient coercion into caller types
//! - **Cooperative Cancellation**: every operation takes a
//!   [`CancellationToken`]
//! - **Shared Use**: `&self` API with atomic request ids
//!
//! ## Usage
//!
//! ```rust,no_run
//! use relaymcp_http::{CancellationToken, ClientConfig, ProtocolClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ProtocolClient::from_config(ClientConfig::new("http://localhost:8000/mcp"))?;
//!     let ct = CancellationToken::new();
//!
//!     client.initialize(&ct).await?;
//!     let sum = client.add(2, 3, &ct).await?;
//!     let now = client.get_time("Europe/Berlin", &ct).await?;
//!
//!     println!("2 + 3 = {sum}, time: {now}");
//!     Ok(())
//! }
//! ```
//!
//! ## Wire Format
//!
//! ```text
//! POST /mcp
//! Accept: application/json, text/event-stream
//! MCP-Protocol-Version: 2025-06-18
//! Mcp-Session-Id: <once assigned>
//!
//! {"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"add","arguments":{"a":2,"b":3}}}
//! ```
//!
//! No retries are performed. Errors surface to the caller as [`ClientError`].

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod jsonrpc;
pub mod session;
pub mod tools;
pub mod transport;

pub use client::{ClientInfo, InitializeResult, ProtocolClient, ServerInfo};
pub use config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_PROTOCOL_VERSION};
pub use decode::{decode_response, extract_payload};
pub use error::{ClientError, ClientResult};
pub use tools::{ToolOutput, ToolResult};
pub use tokio_util::sync::CancellationToken;
