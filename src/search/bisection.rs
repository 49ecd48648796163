// Bisection search
//
// "First differing index" binary search. Every mid-point is compared against
// the verdict at `start`, which fixes which side of the boundary is "low".

use anyhow::{ensure, Result};
use tracing::{error, info};

use super::{probe, NoTransitionReason, SearchOutcome, SearchRange};
use crate::logging::LogConfig;
use crate::oracle::{Oracle, Verdict};

/// Live bounds of one bisection run. The transition lies in `[low, high]`,
/// the verdict at `high` differs from the start verdict, and everything
/// below `low` matches it.
#[derive(Debug, Clone, Copy)]
struct SearchState {
    low: i64,
    high: i64,
    /// The verdict at `low` itself is known to match the start verdict
    low_confirmed: bool,
}

impl SearchState {
    // floor((low + high) / 2) without overflow
    fn midpoint(&self) -> i64 {
        (self.low & self.high) + ((self.low ^ self.high) >> 1)
    }

    fn is_adjacent(&self) -> bool {
        self.low.checked_add(1) == Some(self.high)
    }
}

/// Find the index in `(start, end]` where the oracle's verdict changes.
///
/// Cached endpoint verdicts in `range` are trusted; every other verdict,
/// including the final confirmation, comes from the oracle.
pub async fn bisect<O: Oracle>(
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

    let start_verdict = endpoint_verdict(range.start, range.start_verdict, oracle, log).await?;
    let end_verdict = endpoint_verdict(range.end, range.end_verdict, oracle, log).await?;

    info!("start_ret={}", start_verdict.exit_code());
    info!("end_ret={}", end_verdict.exit_code());

    if start_verdict == end_verdict {
        let reason = NoTransitionReason::EndpointsAgree {
            verdict: start_verdict,
        };
        error!("Error: {}", reason);
        return Ok(SearchOutcome::none(reason));
    }

    let mut state = SearchState {
        low: range.start,
        high: range.end,
        low_confirmed: true,
    };

    if state.is_adjacent() {
        return resolve_pair(state, start_verdict, oracle).await;
    }

    while state.low < state.high {
        let mid = state.midpoint();
        let mid_verdict = probe(oracle, mid).await?;
        log.detail(format!("mid={} verdict={}", mid, mid_verdict));

        if mid_verdict == start_verdict {
            state.low = mid + 1;
            state.low_confirmed = false;
        } else {
            state.high = mid;
        }

        info!(
            "Updated search range - start: {}, end: {}",
            state.low, state.high
        );

        if state.is_adjacent() {
            return resolve_pair(state, start_verdict, oracle).await;
        }
    }

    // Converged on a single candidate without passing through an adjacent
    // pair; confirm it before reporting.
    let candidate = state.low;
    let verdict = probe(oracle, candidate).await?;
    if verdict != start_verdict {
        info!("Transition found at {}", candidate);
        Ok(SearchOutcome::found(candidate))
    } else {
        let reason = NoTransitionReason::BoundaryUnconfirmed { index: candidate };
        error!("Error: {}", reason);
        Ok(SearchOutcome::none(reason))
    }
}

async fn endpoint_verdict<O: Oracle>(
    index: i64,
    cached: Option<Verdict>,
    oracle: &mut O,
    log: &LogConfig,
) -> Result<Verdict> {
    match cached {
        Some(verdict) => {
            log.detail(format!("using cached verdict {} for {}", verdict, oracle.label(index)));
            Ok(verdict)
        }
        None => probe(oracle, index).await,
    }
}

/// Two candidates left: the boundary is `low` or `high`.
async fn resolve_pair<O: Oracle>(
    state: SearchState,
    start_verdict: Verdict,
    oracle: &mut O,
) -> Result<SearchOutcome> {
    if !state.low_confirmed && probe(oracle, state.low).await? != start_verdict {
        info!("Transition found at {}", state.low);
        return Ok(SearchOutcome::found(state.low));
    }

    if probe(oracle, state.high).await? != start_verdict {
        info!("Transition found at {}", state.high);
        return Ok(SearchOutcome::found(state.high));
    }

    let reason = NoTransitionReason::PairExhausted {
        low: state.low,
        high: state.high,
    };
    error!("Error: {}", reason);
    Ok(SearchOutcome::none(reason))
}
