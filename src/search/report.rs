// Search report
//
// JSON record of one search: what was searched, what was found, and every
// probe along the way.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{SearchMode, SearchOutcome, SearchRange};
use crate::oracle::Probe;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub mode: SearchMode,
    pub start: i64,
    pub end: i64,
    pub outcome: SearchOutcome,
    /// Shortcut for `outcome.transition()`
    pub transition: Option<i64>,
    pub probes: Vec<Probe>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchReport {
    pub fn new(
        mode: SearchMode,
        range: &SearchRange,
        outcome: SearchOutcome,
        probes: Vec<Probe>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            mode,
            start: range.start,
            end: range.end,
            transition: outcome.transition(),
            outcome,
            probes,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Total time spent inside the oracle.
    pub fn oracle_time_ms(&self) -> u64 {
        self.probes.iter().map(|p| p.elapsed_ms).sum()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize search report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write search report: {}", path.display()))?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read search report: {}", path.display()))?;
        serde_json::from_str(&json).context("Failed to parse search report")
    }
}
