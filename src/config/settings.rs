// Configuration structs

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::*;
use super::error::ConfigError;
use crate::oracle::Verdict;

/// Search configuration as persisted in `bisector_cfg.json`.
///
/// Built once from the file and treated as immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Shell command run for every probe
    #[serde(rename = "cmd")]
    pub command: String,

    /// Environment variable that carries the probed value
    #[serde(rename = "env_name")]
    pub param_name: String,

    pub start: i64,
    pub end: i64,

    /// Consecutive successful runs required before a value counts as passing
    pub pass_count: u32,

    /// Cached exit code at `start` (0 = pass)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ret: Option<i32>,

    /// Cached exit code at `end` (0 = pass)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ret: Option<i32>,

    /// Per-run wall clock limit; runs that exceed it are killed and fail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl SearchConfig {
    /// Config with placeholder values, as written by `--generate-config`.
    pub fn template() -> Self {
        Self {
            command: TEMPLATE_COMMAND.to_string(),
            param_name: TEMPLATE_ENV_NAME.to_string(),
            start: TEMPLATE_START,
            end: TEMPLATE_END,
            pass_count: TEMPLATE_PASS_COUNT,
            start_ret: None,
            end_ret: None,
            timeout_secs: None,
        }
    }

    /// Check the invariants the searches rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command.trim().is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        if !is_valid_env_name(&self.param_name) {
            return Err(ConfigError::InvalidEnvName(self.param_name.clone()));
        }
        if self.start >= self.end {
            return Err(ConfigError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.pass_count == 0 {
            return Err(ConfigError::InvalidPassCount);
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Verdicts already known for `start` and `end`, if the file supplied them.
    pub fn cached_endpoint_verdicts(&self) -> (Option<Verdict>, Option<Verdict>) {
        (
            self.start_ret.map(Verdict::from_exit_code),
            self.end_ret.map(Verdict::from_exit_code),
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn is_valid_env_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('=') && !name.contains('\0')
}
