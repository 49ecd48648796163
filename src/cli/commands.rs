// Command handlers for the two binaries

use anyhow::{Context, Result};
use chrono::Utc;
use clap::CommandFactory;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};

use super::args::{BisectorArgs, GitArgs};
use crate::config::{generate_template, load_config, SearchConfig};
use crate::logging::LogConfig;
use crate::oracle::{EnvOracle, Oracle, RecordingOracle};
use crate::revision::{collect_commits, CommitList, RevisionOracle};
use crate::search::{run_search, SearchMode, SearchOutcome, SearchRange, SearchReport};

/// `bisector`: search the configured environment-variable range.
///
/// Configuration problems exit with 1; anything the search itself reports,
/// including "no transition", exits with 0.
pub async fn run_bisector(args: BisectorArgs) -> Result<ExitCode> {
    let log = LogConfig::new(args.verbose);

    if args.generate_config {
        let dir = std::env::current_dir().context("Failed to determine current directory")?;
        return Ok(match generate_template(&dir) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        });
    }

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(?config, "Loaded configuration from {}", args.config.display());

    let range = SearchRange::from_config(&config);
    let mode = args.mode();

    if args.dry_run {
        log_plan(&config, mode, &range);
        info!("Dry-run mode enabled. No commands will be executed.");
        return Ok(ExitCode::SUCCESS);
    }

    let oracle = EnvOracle::from_config(&config, args.quiet, log);
    execute_search(mode, range, oracle, &log, args.report.as_deref()).await?;
    Ok(ExitCode::SUCCESS)
}

/// `bisector-git`: collect commits, test one ordinal, or search a range.
///
/// Testing a single ordinal exits 0 on pass and 1 on fail, so the binary can
/// serve as the `cmd` of a `bisector` config.
pub async fn run_bisector_git(args: GitArgs) -> Result<ExitCode> {
    let log = LogConfig::new(args.verbose);

    if args.generate {
        let commits = collect_commits(&args.repo).await?;
        commits.save(&args.commits)?;
        return Ok(ExitCode::SUCCESS);
    }

    match (args.range_bounds(), args.number) {
        (Some((start, end)), _) => {
            let oracle = revision_oracle(&args, log)?;
            if let Some(last) = oracle.commits().last_ordinal() {
                if end > last {
                    warn!("Range end {} is past the newest commit (ordinal {})", end, last);
                }
            }
            let range = SearchRange::new(start, end);
            execute_search(args.mode(), range, oracle, &log, args.report.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        (None, Some(number)) => {
            let oracle = revision_oracle(&args, log)?;
            let verdict = oracle.test_commit(number).await?;
            info!(
                "Test result: {}",
                if verdict.is_pass() { "Success" } else { "Failure" }
            );
            Ok(ExitCode::from(verdict.exit_code() as u8))
        }
        (None, None) => {
            GitArgs::command()
                .print_help()
                .context("Failed to print help")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn revision_oracle(args: &GitArgs, log: LogConfig) -> Result<RevisionOracle> {
    let commits = CommitList::load(&args.commits)?;
    Ok(RevisionOracle::new(commits, &args.repo, &args.build_dir)
        .with_test_command(&args.command)
        .with_build_command(&args.build)
        .with_pass_count(args.pass_count)
        .with_quiet(args.quiet)
        .with_timeout(args.timeout.map(Duration::from_secs))
        .with_log(log))
}

/// Run one search, log the result, and optionally write the report.
pub async fn execute_search<O: Oracle>(
    mode: SearchMode,
    range: SearchRange,
    oracle: O,
    log: &LogConfig,
    report_path: Option<&Path>,
) -> Result<SearchOutcome> {
    let started_at = Utc::now();
    let mut oracle = RecordingOracle::new(oracle);

    info!("Starting {} search over {}..{}", mode, range.start, range.end);
    let outcome = run_search(mode, range, &mut oracle, log).await?;

    match outcome.transition() {
        Some(index) => info!("result: {}", index),
        None => info!("result: none"),
    }

    let (_, probes) = oracle.into_parts();
    let report = SearchReport::new(mode, &range, outcome.clone(), probes, started_at);
    info!(
        probes = report.probes.len(),
        oracle_ms = report.oracle_time_ms(),
        "Search finished"
    );

    if let Some(path) = report_path {
        report.save(path)?;
        info!("Search report written to {}", path.display());
    }

    Ok(outcome)
}

fn log_plan(config: &SearchConfig, mode: SearchMode, range: &SearchRange) {
    info!(
        "Would run '{}' with {} in {}..{} using {} search, {} passing run(s) per value",
        config.command, config.param_name, config.start, config.end, mode, config.pass_count
    );
    match mode {
        SearchMode::Bisection => info!(
            "At most {} values would be probed",
            range.max_bisection_probes()
        ),
        SearchMode::Sequential => info!(
            "At most {} values would be probed",
            config.end.abs_diff(config.start)
        ),
    }
    if let Some(timeout) = config.timeout() {
        info!("Each run would be limited to {:?}", timeout);
    }
}
