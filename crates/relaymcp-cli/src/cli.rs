//! CLI argument parsing and configuration types

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use relaymcp_http::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_PROTOCOL_VERSION};
use tracing::Level;

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(
    name = "relaymcp",
    version,
    about = "Call tools on an MCP server over Streamable HTTP",
    long_about = "relaymcp performs the MCP initialize handshake against a single HTTP endpoint\n\
                  and invokes tools on it. Responses may be plain JSON or SSE framed.\n\n\
                  Results are printed to stdout, logs go to stderr (RUST_LOG overrides -v)."
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Connection settings
    #[command(flatten)]
    pub connection: Connection,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Connection settings shared by all subcommands
#[derive(Args, Debug, Clone)]
pub struct Connection {
    /// MCP endpoint URL
    #[arg(long, global = true, env = "MCP_URL", default_value = DEFAULT_ENDPOINT)]
    pub url: String,

    /// Protocol version advertised during the handshake
    #[arg(
        long,
        global = true,
        env = "MCP_PROTOCOL_VERSION",
        default_value = DEFAULT_PROTOCOL_VERSION
    )]
    pub protocol_version: String,

    /// Bearer token forwarded in the Authorization header
    #[arg(long, global = true, env = "MCP_AUTH_TOKEN", hide_env_values = true)]
    pub auth: Option<String>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long, global = true, env = "MCP_TIMEOUT_SECS")]
    pub timeout: Option<u64>,
}

impl Connection {
    /// Client configuration for these settings
    pub fn to_config(&self) -> ClientConfig {
        ClientConfig {
            protocol_version: self.protocol_version.clone(),
            auth_token: self.auth.clone(),
            request_timeout: self.timeout.map(Duration::from_secs),
            client_name: "relaymcp-cli".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            ..ClientConfig::new(self.url.clone())
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Perform the handshake and print the negotiated session
    Handshake,

    /// Add two integers with the `add` tool
    Add {
        /// First integer
        #[arg(allow_negative_numbers = true)]
        a: i64,
        /// Second integer
        #[arg(allow_negative_numbers = true)]
        b: i64,
    },

    /// Current time from the `get_time` tool
    Time {
        /// IANA time zone
        #[arg(long, default_value = "Europe/Berlin")]
        tz: String,
    },

    /// Call any tool with JSON arguments
    Call {
        /// Tool name
        name: String,

        /// Arguments as a JSON object
        #[arg(long, short = 'a', default_value = "{}")]
        arguments: String,
    },
}

impl Cli {
    /// Log level selected by the verbosity flags
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
