// Probe recording
//
// Wraps any oracle and keeps a timestamped record of every evaluation, which
// ends up in the search report.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{Oracle, Verdict};

/// One oracle evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub index: i64,
    pub verdict: Verdict,
    pub elapsed_ms: u64,
    pub at: DateTime<Utc>,
}

pub struct RecordingOracle<O> {
    inner: O,
    probes: Vec<Probe>,
}

impl<O: Oracle> RecordingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            probes: Vec::new(),
        }
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// Indices in evaluation order.
    pub fn indices(&self) -> Vec<i64> {
        self.probes.iter().map(|p| p.index).collect()
    }

    pub fn into_parts(self) -> (O, Vec<Probe>) {
        (self.inner, self.probes)
    }
}

#[async_trait]
impl<O: Oracle> Oracle for RecordingOracle<O> {
    fn label(&self, index: i64) -> String {
        self.inner.label(index)
    }

    async fn evaluate(&mut self, index: i64) -> Result<Verdict> {
        let at = Utc::now();
        let started = Instant::now();
        let verdict = self.inner.evaluate(index).await?;

        self.probes.push(Probe {
            index,
            verdict,
            elapsed_ms: started.elapsed().as_millis() as u64,
            at,
        });
        Ok(verdict)
    }
}
