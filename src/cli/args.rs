// Command-line arguments for both binaries

use clap::Parser;
use std::path::PathBuf;

use crate::config::constants::{
    DEFAULT_BUILD_COMMAND, DEFAULT_COMMIT_LIST_FILE, DEFAULT_CONFIG_FILE, DEFAULT_TEST_COMMAND,
};
use crate::search::SearchMode;

/// Binary or sequential search for the value where a command starts failing.
#[derive(Debug, Parser)]
#[command(name = "bisector", version)]
#[command(after_help = "Example: bisector --config myconfig.json --quiet")]
pub struct BisectorArgs {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Use a sequential scan instead of binary search
    #[arg(short, long)]
    pub sequential: bool,

    /// Suppress command output
    #[arg(short, long)]
    pub quiet: bool,

    /// Validate the configuration and log the plan without running commands
    #[arg(long)]
    pub dry_run: bool,

    /// Log every run and verdict
    #[arg(short, long)]
    pub verbose: bool,

    /// Write a configuration template to the current directory and exit
    #[arg(short, long = "generate-config")]
    pub generate_config: bool,

    /// Write a JSON report of the search to FILE
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl BisectorArgs {
    pub fn mode(&self) -> SearchMode {
        if self.sequential {
            SearchMode::Sequential
        } else {
            SearchMode::Bisection
        }
    }
}

/// Check out, build and test commits of a git repository by ordinal.
#[derive(Debug, Parser)]
#[command(name = "bisector-git", version)]
pub struct GitArgs {
    /// Ordinal of the commit to test (0 = oldest)
    #[arg(allow_negative_numbers = true, value_parser = clap::value_parser!(i64).range(0..))]
    pub number: Option<i64>,

    /// Path to the git repository
    #[arg(short, long)]
    pub repo: PathBuf,

    /// Path to the build directory
    #[arg(short = 'd', long)]
    pub build_dir: PathBuf,

    /// Collect the repository's commits into the commit list file
    #[arg(short, long)]
    pub generate: bool,

    /// Test command run in the build directory
    #[arg(short, long, default_value = DEFAULT_TEST_COMMAND)]
    pub command: String,

    /// Build command run in the build directory
    #[arg(short, long, default_value = DEFAULT_BUILD_COMMAND)]
    pub build: String,

    /// Suppress command and progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Commit list file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_COMMIT_LIST_FILE)]
    pub commits: PathBuf,

    /// Search ordinals START..=END in-process instead of testing one commit
    #[arg(
        long,
        num_args = 2,
        value_names = ["START", "END"],
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    pub range: Option<Vec<i64>>,

    /// Use a sequential scan with --range
    #[arg(short, long, requires = "range")]
    pub sequential: bool,

    /// Consecutive passing test runs required per commit
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pass_count: u32,

    /// Per-run timeout in seconds for build and test commands
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Log every run and verdict
    #[arg(short, long)]
    pub verbose: bool,

    /// Write a JSON report of the search to FILE
    #[arg(long, value_name = "FILE", requires = "range")]
    pub report: Option<PathBuf>,
}

impl GitArgs {
    pub fn mode(&self) -> SearchMode {
        if self.sequential {
            SearchMode::Sequential
        } else {
            SearchMode::Bisection
        }
    }

    pub fn range_bounds(&self) -> Option<(i64, i64)> {
        match self.range.as_deref() {
            Some([start, end]) => Some((*start, *end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bisector_defaults() {
        let args = BisectorArgs::try_parse_from(["bisector"]).unwrap();
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(args.mode(), SearchMode::Bisection);
        assert!(!args.quiet && !args.dry_run && !args.verbose && !args.generate_config);
        assert!(args.report.is_none());
    }

    #[test]
    fn test_bisector_flags() {
        let args = BisectorArgs::try_parse_from([
            "bisector", "-c", "my.json", "-s", "-q", "--dry-run", "-v", "--report", "out.json",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("my.json"));
        assert_eq!(args.mode(), SearchMode::Sequential);
        assert!(args.quiet && args.dry_run && args.verbose);
        assert_eq!(args.report, Some(PathBuf::from("out.json")));

        let args = BisectorArgs::try_parse_from(["bisector", "-g"]).unwrap();
        assert!(args.generate_config);
    }

    #[test]
    fn test_git_requires_repo_and_build_dir() {
        assert!(GitArgs::try_parse_from(["bisector-git", "3"]).is_err());
        assert!(GitArgs::try_parse_from(["bisector-git", "3", "-r", "repo"]).is_err());

        let args = GitArgs::try_parse_from(["bisector-git", "3", "-r", "repo", "-d", "build"]).unwrap();
        assert_eq!(args.number, Some(3));
        assert_eq!(args.command, DEFAULT_TEST_COMMAND);
        assert_eq!(args.build, DEFAULT_BUILD_COMMAND);
        assert_eq!(args.commits, PathBuf::from(DEFAULT_COMMIT_LIST_FILE));
        assert_eq!(args.pass_count, 1);
        assert!(args.range_bounds().is_none());
    }

    #[test]
    fn test_git_rejects_negative_ordinals() {
        let args = GitArgs::try_parse_from(["bisector-git", "0", "-r", "r", "-d", "b"]).unwrap();
        assert_eq!(args.number, Some(0));

        let err = GitArgs::try_parse_from(["bisector-git", "-r", "r", "-d", "b", "--range", "-2", "5"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        assert!(GitArgs::try_parse_from(["bisector-git", "-1", "-r", "r", "-d", "b"]).is_err());
    }

    #[test]
    fn test_git_range() {
        let args = GitArgs::try_parse_from([
            "bisector-git", "-r", "repo", "-d", "build", "--range", "2", "40", "-s", "--pass-count", "3",
        ])
        .unwrap();
        assert_eq!(args.range_bounds(), Some((2, 40)));
        assert_eq!(args.mode(), SearchMode::Sequential);
        assert_eq!(args.pass_count, 3);

        assert!(GitArgs::try_parse_from(["bisector-git", "-r", "r", "-d", "b", "-s"]).is_err());
        assert!(GitArgs::try_parse_from([
            "bisector-git", "-r", "r", "-d", "b", "--range", "1", "2", "--pass-count", "0"
        ])
        .is_err());
    }
}
