// Environment-variable oracle
//
// Runs the configured command with `<param_name>=<value>` added to the
// child's environment, repeating until `pass_count` consecutive successes.

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use super::shell::{run_repeated, ShellCommand};
use super::{Oracle, Verdict};
use crate::config::SearchConfig;
use crate::logging::LogConfig;

#[derive(Debug, Clone)]
pub struct EnvOracle {
    command: String,
    param_name: String,
    pass_count: u32,
    quiet: bool,
    timeout: Option<Duration>,
    working_dir: Option<PathBuf>,
    log: LogConfig,
}

impl EnvOracle {
    pub fn new(command: impl Into<String>, param_name: impl Into<String>, pass_count: u32) -> Self {
        Self {
            command: command.into(),
            param_name: param_name.into(),
            pass_count: pass_count.max(1),
            quiet: false,
            timeout: None,
            working_dir: None,
            log: LogConfig::default(),
        }
    }

    pub fn from_config(config: &SearchConfig, quiet: bool, log: LogConfig) -> Self {
        Self::new(&config.command, &config.param_name, config.pass_count)
            .with_quiet(quiet)
            .with_timeout(config.timeout())
            .with_log(log)
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Run the repeat policy at `value`. Never fails: a command that cannot
    /// be started is simply a failing run.
    pub async fn verdict_at(&self, value: i64) -> Verdict {
        let mut cmd = ShellCommand::new(&self.command)
            .env(&self.param_name, value.to_string())
            .quiet(self.quiet)
            .timeout(self.timeout);
        cmd.current_dir = self.working_dir.clone();

        run_repeated(&cmd, self.pass_count, &self.label(value), &self.log).await
    }
}

#[async_trait]
impl Oracle for EnvOracle {
    fn label(&self, index: i64) -> String {
        format!("{}={}", self.param_name, index)
    }

    async fn evaluate(&mut self, index: i64) -> Result<Verdict> {
        Ok(self.verdict_at(index).await)
    }
}
