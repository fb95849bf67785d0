use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match relaymcp_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if !e.is_cancelled() {
                for hint in e.suggestions() {
                    eprintln!("  hint: {hint}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
