// Revision oracle - checkout, build, test
//
// The verdict at ordinal `n` is "does commit n build and pass the test
// command". A failed build is a failing verdict; a checkout that cannot be
// done is an error, since nothing was actually tested.

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use super::commits::CommitList;
use super::git;
use crate::config::constants::{DEFAULT_BUILD_COMMAND, DEFAULT_TEST_COMMAND};
use crate::logging::LogConfig;
use crate::oracle::{run_repeated, run_shell, Oracle, ShellCommand, Verdict};

#[derive(Debug, Clone)]
pub struct RevisionOracle {
    commits: CommitList,
    repo_dir: PathBuf,
    build_dir: PathBuf,
    build_command: String,
    test_command: String,
    pass_count: u32,
    quiet: bool,
    timeout: Option<Duration>,
    log: LogConfig,
}

impl RevisionOracle {
    pub fn new(commits: CommitList, repo_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            commits,
            repo_dir: repo_dir.into(),
            build_dir: build_dir.into(),
            build_command: DEFAULT_BUILD_COMMAND.to_string(),
            test_command: DEFAULT_TEST_COMMAND.to_string(),
            pass_count: 1,
            quiet: false,
            timeout: None,
            log: LogConfig::default(),
        }
    }

    pub fn with_build_command(mut self, command: impl Into<String>) -> Self {
        self.build_command = command.into();
        self
    }

    pub fn with_test_command(mut self, command: impl Into<String>) -> Self {
        self.test_command = command.into();
        self
    }

    pub fn with_pass_count(mut self, pass_count: u32) -> Self {
        self.pass_count = pass_count.max(1);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn commits(&self) -> &CommitList {
        &self.commits
    }

    /// Check out and build ordinal `n`, then run the test command.
    pub async fn test_commit(&self, n: i64) -> Result<Verdict> {
        let commit = self.commits.commit_at(n)?;
        git::checkout(&self.repo_dir, commit, self.quiet).await?;

        let build = ShellCommand::new(&self.build_command)
            .current_dir(&self.build_dir)
            .quiet(self.quiet)
            .timeout(self.timeout);
        let outcome = run_shell(&build).await;
        if !outcome.success() {
            warn!("Build failed for commit {} ({:?})", commit, outcome);
            return Ok(Verdict::Fail);
        }
        info!("Project built using command: {}", self.build_command);

        let test = ShellCommand::new(&self.test_command)
            .current_dir(&self.build_dir)
            .quiet(self.quiet)
            .timeout(self.timeout);
        Ok(run_repeated(&test, self.pass_count, &self.label(n), &self.log).await)
    }
}

#[async_trait]
impl Oracle for RevisionOracle {
    fn label(&self, index: i64) -> String {
        match self.commits.commit_at(index) {
            Ok(commit) => format!("commit #{} ({})", index, commit),
            Err(_) => format!("commit #{}", index),
        }
    }

    async fn evaluate(&mut self, index: i64) -> Result<Verdict> {
        self.test_commit(index).await
    }
}
