//! # relaymcp-cli
//!
//! Command-line front end for [`relaymcp_http`]. Every subcommand performs the
//! MCP handshake first, then calls the requested tool.
//!
//! ```bash
//! relaymcp --url http://localhost:8000/mcp add 2 3
//! relaymcp time --tz Asia/Tokyo
//! relaymcp call echo --arguments '{"text": "hi"}'
//! MCP_URL=http://localhost:8000/mcp relaymcp -v handshake
//! ```

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Commands, Connection};
pub use commands::CommandExecutor;
pub use error::{CliError, CliResult};

use clap::Parser;
use relaymcp_http::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let ct = CancellationToken::new();
    let signal_ct = ct.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            signal_ct.cancel();
        }
    });

    let executor = CommandExecutor::new(&cli.connection, ct)?;
    let mut stdout = std::io::stdout().lock();
    let result = executor.execute(&cli.command, &mut stdout).await;
    signal_task.abort();

    debug!(ok = result.is_ok(), "Command finished");
    result
}

/// Logs go to stderr so results on stdout stay pipeable. `RUST_LOG` wins over
/// the verbosity flags.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "relaymcp_http={level},relaymcp_cli={level}",
            level = cli.log_level()
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // A subscriber may already be installed when embedded
    let _ = if cli.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
