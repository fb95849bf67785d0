//! Subcommands driven end to end against a stub MCP server

use pretty_assertions::assert_eq;
use relaymcp_cli::{CliError, CommandExecutor, Commands, Connection};
use relaymcp_http::{CancellationToken, ClientError};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connection(server: &MockServer) -> Connection {
    Connection {
        url: format!("{}/mcp", server.uri()),
        protocol_version: "2025-06-18".to_string(),
        auth: None,
        timeout: Some(5),
    }
}

async fn mount_handshake(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "initialize"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Mcp-Session-Id", "sess-42")
                .set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {
                        "protocolVersion": "2025-03-26",
                        "serverInfo": {"name": "demo", "version": "1.0.0"}
                    }
                })),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "notifications/initialized"})))
        .respond_with(ResponseTemplate::new(202))
        .mount(server)
        .await;
}

async fn mount_tool(server: &MockServer, tool: &str, result: Value) {
    let payload = json!({"jsonrpc": "2.0", "id": 2, "result": result});
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(
            json!({"method": "tools/call", "params": {"name": tool}}),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(format!("event: message\ndata: {payload}\n\n"), "text/event-stream"),
        )
        .mount(server)
        .await;
}

async fn run(server: &MockServer, command: Commands) -> Result<String, CliError> {
    let executor = CommandExecutor::new(&connection(server), CancellationToken::new())?;
    let mut out = Vec::new();
    executor.execute(&command, &mut out).await?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}

#[tokio::test]
async fn test_handshake_prints_session() {
    let server = MockServer::start().await;
    mount_handshake(&server).await;

    let out = run(&server, Commands::Handshake).await.unwrap();
    assert_eq!(
        out,
        "protocol version: 2025-03-26\nsession id: sess-42\nserver: demo 1.0.0\n"
    );
}

#[tokio::test]
async fn test_add_prints_sum() {
    let server = MockServer::start().await;
    mount_handshake(&server).await;
    mount_tool(
        &server,
        "add",
        json!({"content": [{"type": "text", "text": "5"}], "structuredContent": {"result": 5}}),
    )
    .await;

    let out = run(&server, Commands::Add { a: 2, b: 3 }).await.unwrap();
    assert_eq!(out, "5\n");
}

#[tokio::test]
async fn test_time_prints_text() {
    let server = MockServer::start().await;
    mount_handshake(&server).await;
    mount_tool(
        &server,
        "get_time",
        json!({"content": [{"type": "text", "text": "2025-01-01T12:00:00+01:00"}]}),
    )
    .await;

    let out = run(
        &server,
        Commands::Time {
            tz: "Europe/Berlin".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(out, "2025-01-01T12:00:00+01:00\n");
}

#[tokio::test]
async fn test_call_prints_structured_json() {
    let server = MockServer::start().await;
    mount_handshake(&server).await;
    mount_tool(
        &server,
        "lookup",
        json!({"content": [], "structuredContent": {"result": {"hits": 2}}}),
    )
    .await;

    let out = run(
        &server,
        Commands::Call {
            name: "lookup".to_string(),
            arguments: r#"{"q": "rust"}"#.to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(out, "{\n  \"hits\": 2\n}\n");
}

#[tokio::test]
async fn test_tool_failure_is_reported() {
    let server = MockServer::start().await;
    mount_handshake(&server).await;
    mount_tool(
        &server,
        "add",
        json!({"isError": true, "content": [{"type": "text", "text": "bad input"}]}),
    )
    .await;

    let err = run(&server, Commands::Add { a: 1, b: 1 }).await.unwrap_err();
    assert!(matches!(err, CliError::Client(ClientError::ToolFailed(ref m)) if m == "bad input"));
}

#[tokio::test]
async fn test_rejected_handshake_surfaces_suggestions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = run(&server, Commands::Handshake).await.unwrap_err();
    assert!(matches!(err, CliError::Client(ClientError::Transport(_))));
    assert!(!err.suggestions().is_empty());
}
