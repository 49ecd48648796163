// Oracle module
//
// An oracle answers "does the check pass at index k?". The searches only see
// the `Oracle` trait, so the same bisection drives an environment-variable
// probe, a checkout+build+test probe, or a synthetic function in tests.

mod env;
mod recording;
mod shell;

pub use env::EnvOracle;
pub use recording::{Probe, RecordingOracle};
pub use shell::{run_repeated, run_shell, RunOutcome, ShellCommand};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary outcome of one oracle evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// 0 is a pass, anything else is a failure.
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }

    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail => write!(f, "fail"),
        }
    }
}

/// Evaluate a verdict at an integer index.
///
/// Implementations may be slow (they usually spawn processes) and may be
/// flaky; they are called strictly one at a time. An `Err` means the probe
/// could not be carried out at all (e.g. a checkout failed) and aborts the
/// search; an unsuccessful check is `Ok(Verdict::Fail)`.
#[async_trait]
pub trait Oracle: Send {
    /// Human-readable name for the probe at `index`, used in log lines.
    fn label(&self, index: i64) -> String {
        index.to_string()
    }

    async fn evaluate(&mut self, index: i64) -> Result<Verdict>;
}

#[async_trait]
impl<O: Oracle + ?Sized> Oracle for &mut O {
    fn label(&self, index: i64) -> String {
        (**self).label(index)
    }

    async fn evaluate(&mut self, index: i64) -> Result<Verdict> {
        (**self).evaluate(index).await
    }
}

/// Oracle backed by a plain function; handy for synthetic checks.
pub struct FnOracle<F> {
    f: F,
}

impl<F> FnOracle<F>
where
    F: FnMut(i64) -> Verdict + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Oracle for FnOracle<F>
where
    F: FnMut(i64) -> Verdict + Send,
{
    async fn evaluate(&mut self, index: i64) -> Result<Verdict> {
        Ok((self.f)(index))
    }
}
