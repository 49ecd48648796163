// bisector - find where a command's outcome flips
// Main entry point

use std::process::ExitCode;

use bisector::cli::{run_bisector, BisectorArgs};
use bisector::logging::{init_tracing, LogConfig};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = BisectorArgs::parse();
    init_tracing(LogConfig::new(args.verbose).default_directive());

    match run_bisector(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
