//! Subcommand execution

use std::io::Write;

use relaymcp_http::{CancellationToken, ProtocolClient, ToolResult};
use serde_json::{Map, Value};
use tracing::debug;

use crate::cli::{Commands, Connection};
use crate::error::{CliError, CliResult};

/// Runs one subcommand against a freshly initialized client
pub struct CommandExecutor {
    client: ProtocolClient,
    ct: CancellationToken,
}

impl CommandExecutor {
    /// Build a client for `connection`; no network traffic yet
    pub fn new(connection: &Connection, ct: CancellationToken) -> CliResult<Self> {
        let client = ProtocolClient::from_config(connection.to_config())?;
        Ok(Self { client, ct })
    }

    /// Handshake, then run `command`, writing the result to `out`
    pub async fn execute<W: Write>(&self, command: &Commands, out: &mut W) -> CliResult<()> {
        // Parse arguments before touching the network
        let call_arguments = match command {
            Commands::Call { arguments, .. } => Some(parse_arguments(arguments)?),
            _ => None,
        };

        let init = self.client.initialize(&self.ct).await?;
        debug!(
            protocol_version = %self.client.protocol_version(),
            server = ?init.server_info,
            "Handshake complete"
        );

        match command {
            Commands::Handshake => {
                writeln!(out, "protocol version: {}", self.client.protocol_version())?;
                match self.client.session_id() {
                    Some(id) => writeln!(out, "session id: {id}")?,
                    None => writeln!(out, "session id: (none)")?,
                }
                if let Some(server) = &init.server_info {
                    match &server.version {
                        Some(version) => writeln!(out, "server: {} {version}", server.name)?,
                        None => writeln!(out, "server: {}", server.name)?,
                    }
                }
            }
            Commands::Add { a, b } => {
                let sum = self.client.add(*a, *b, &self.ct).await?;
                writeln!(out, "{sum}")?;
            }
            Commands::Time { tz } => {
                let time = self.client.get_time(tz, &self.ct).await?;
                writeln!(out, "{time}")?;
            }
            Commands::Call { name, .. } => {
                let arguments = call_arguments.unwrap_or_default();
                let result = self.client.call_tool(name, arguments, &self.ct).await?;
                writeln!(out, "{}", render(&result)?)?;
            }
        }
        Ok(())
    }
}

/// Parse `--arguments`, which must be a JSON object
pub fn parse_arguments(raw: &str) -> CliResult<Map<String, Value>> {
    match serde_json::from_str(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(CliError::InvalidArguments(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Text results print as-is, structured ones as pretty JSON
pub fn render(result: &ToolResult) -> CliResult<String> {
    Ok(match result {
        ToolResult::Text(text) => text.clone(),
        ToolResult::Structured(Value::String(text)) => text.clone(),
        ToolResult::Structured(value) => serde_json::to_string_pretty(value)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_arguments_object() {
        let map = parse_arguments(r#"{"a": 1, "b": "x"}"#).unwrap();
        assert_eq!(map.get("a"), Some(&json!(1)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_parse_arguments_rejects_non_object() {
        assert!(matches!(
            parse_arguments("[1, 2]"),
            Err(CliError::InvalidArguments(_))
        ));
        assert!(matches!(parse_arguments("{oops"), Err(CliError::Json(_))));
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&ToolResult::Text("hi".into())).unwrap(), "hi");
        assert_eq!(
            render(&ToolResult::Structured(json!("12:00"))).unwrap(),
            "12:00"
        );
        assert_eq!(render(&ToolResult::Structured(json!(7))).unwrap(), "7");
        assert_eq!(
            render(&ToolResult::Structured(json!({"k": 1}))).unwrap(),
            "{\n  \"k\": 1\n}"
        );
    }

    #[tokio::test]
    async fn test_invalid_arguments_fail_before_network() {
        let connection = Connection {
            // Nothing listens here; the error must come from argument parsing
            url: "http://127.0.0.1:9/mcp".to_string(),
            protocol_version: "2025-06-18".to_string(),
            auth: None,
            timeout: Some(1),
        };
        let executor = CommandExecutor::new(&connection, CancellationToken::new()).unwrap();
        let command = Commands::Call {
            name: "echo".to_string(),
            arguments: "42".to_string(),
        };
        let mut out = Vec::new();
        let err = executor.execute(&command, &mut out).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidArguments(_)));
        assert!(out.is_empty());
    }
}
