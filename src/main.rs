//! `ssig` command-line entry point.

use std::process::ExitCode;

use clap::Parser;

use state_signals::cli_app::{self, Cli};
use state_signals::logger;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match cli_app::effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", cli_app::render_error(&e));
            return ExitCode::FAILURE;
        }
    };
    logger::init_tracing(&config.logging.level);

    match cli_app::run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(code = e.code(), "command failed");
            eprintln!("{}", cli_app::render_error(&e));
            ExitCode::FAILURE
        }
    }
}
