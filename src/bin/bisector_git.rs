// bisector-git - test or bisect git commits by ordinal

use std::process::ExitCode;

use bisector::cli::{run_bisector_git, GitArgs};
use bisector::logging::{init_tracing, LogConfig};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = GitArgs::parse();
    let directive = if args.quiet && !args.verbose {
        "warn"
    } else {
        LogConfig::new(args.verbose).default_directive()
    };
    init_tracing(directive);

    match run_bisector_git(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
