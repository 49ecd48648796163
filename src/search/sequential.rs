// Sequential search
//
// Linear scan from `start`, reporting the first index whose verdict differs
// from its predecessor's. Slow, but it makes no single-transition assumption,
// which makes it a useful cross-check for the bisection.

use anyhow::{ensure, Result};
use tracing::{error, info};

use super::{probe, NoTransitionReason, SearchOutcome, SearchRange};
use crate::logging::LogConfig;
use crate::oracle::Oracle;

/// Scan `start..end` (end excluded). Cached endpoint verdicts are ignored.
pub async fn sequential_search<O: Oracle>(
    range: SearchRange,
    oracle: &mut O,
    log: &LogConfig,
) -> Result<SearchOutcome> {
    ensure!(
        range.start < range.end,
        "start ({}) must be less than end ({})",
        range.start,
        range.end
    );

    let mut last = probe(oracle, range.start).await?;
    log.detail(format!("{} -> {}", oracle.label(range.start), last));

    for index in (range.start + 1)..range.end {
        let current = probe(oracle, index).await?;
        log.detail(format!("{} -> {}", oracle.label(index), current));
        if current != last {
            info!("Transition found at {}", index);
            return Ok(SearchOutcome::found(index));
        }
        last = current;
    }

    let reason = NoTransitionReason::ScanExhausted {
        start: range.start,
        end: range.end,
    };
    error!("Error: {}", reason);
    Ok(SearchOutcome::none(reason))
}
