// Transition search
//
// Both searches look for the single index where an oracle's verdict flips.
// They assume exactly one transition in the range and report, rather than
// raise, when the range does not show one.

mod bisection;
mod report;
mod sequential;

pub use bisection::bisect;
pub use report::SearchReport;
pub use sequential::sequential_search;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SearchConfig;
use crate::logging::LogConfig;
use crate::oracle::{Oracle, Verdict};

/// Which algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Bisection,
    Sequential,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Bisection => write!(f, "bisection"),
            SearchMode::Sequential => write!(f, "sequential"),
        }
    }
}

/// Domain bounds plus any verdicts already known for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRange {
    pub start: i64,
    pub end: i64,
    pub start_verdict: Option<Verdict>,
    pub end_verdict: Option<Verdict>,
}

impl SearchRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            start_verdict: None,
            end_verdict: None,
        }
    }

    pub fn with_cached(mut self, start_verdict: Option<Verdict>, end_verdict: Option<Verdict>) -> Self {
        self.start_verdict = start_verdict;
        self.end_verdict = end_verdict;
        self
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        let (start_verdict, end_verdict) = config.cached_endpoint_verdicts();
        Self::new(config.start, config.end).with_cached(start_verdict, end_verdict)
    }

    /// Probes a bisection needs in the worst case (both endpoints, the
    /// halvings, and the final confirmation pair).
    pub fn max_bisection_probes(&self) -> u64 {
        let width = self.end.abs_diff(self.start).max(1);
        let halvings = u64::from(64 - (width - 1).leading_zeros());
        let endpoints = u64::from(self.start_verdict.is_none()) + u64::from(self.end_verdict.is_none());
        endpoints + halvings + 2
    }
}

/// Why a search ended without a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoTransitionReason {
    /// Both endpoints gave the same verdict
    EndpointsAgree { verdict: Verdict },
    /// The final adjacent pair showed no change on re-evaluation
    PairExhausted { low: i64, high: i64 },
    /// The converged candidate did not differ from the start verdict
    BoundaryUnconfirmed { index: i64 },
    /// A sequential scan saw no change
    ScanExhausted { start: i64, end: i64 },
}

impl fmt::Display for NoTransitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoTransitionReason::EndpointsAgree { verdict } => {
                write!(f, "start and end both {}, no transition in range", verdict)
            }
            NoTransitionReason::PairExhausted { low, high } => {
                write!(f, "no transition found after exhaustive search ({}..={})", low, high)
            }
            NoTransitionReason::BoundaryUnconfirmed { index } => {
                write!(f, "candidate {} did not confirm on re-evaluation", index)
            }
            NoTransitionReason::ScanExhausted { start, end } => {
                write!(f, "can not find a transition in {}..{}", start, end)
            }
        }
    }
}

/// Result of one search invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Transition { index: i64 },
    NoTransition { reason: NoTransitionReason },
}

impl SearchOutcome {
    pub fn transition(&self) -> Option<i64> {
        match self {
            SearchOutcome::Transition { index } => Some(*index),
            SearchOutcome::NoTransition { .. } => None,
        }
    }

    pub(crate) fn found(index: i64) -> Self {
        SearchOutcome::Transition { index }
    }

    pub(crate) fn none(reason: NoTransitionReason) -> Self {
        SearchOutcome::NoTransition { reason }
    }
}

/// Run the chosen search over `range`.
pub async fn run_search<O: Oracle>(
    mode: SearchMode,
    range: SearchRange,
    oracle: &mut O,
    log: &LogConfig,
) -> Result<SearchOutcome> {
    match mode {
        SearchMode::Bisection => bisect(range, oracle, log).await,
        SearchMode::Sequential => sequential_search(range, oracle, log).await,
    }
}

/// Oracle call with the index attached to any infrastructure error.
pub(crate) async fn probe<O: Oracle>(oracle: &mut O, index: i64) -> Result<Verdict> {
    use anyhow::Context;

    oracle
        .evaluate(index)
        .await
        .with_context(|| format!("Failed to evaluate {}", oracle.label(index)))
}
