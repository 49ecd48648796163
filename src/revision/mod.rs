// Revision bisection
//
// Turns "which commit broke it" into the same integer search used for
// environment values: ordinals index an ordered commit list, and the oracle
// checks out, builds and tests the commit at that ordinal.

mod commits;
mod git;
mod oracle;

pub use commits::CommitList;
pub use git::{checkout, collect_commits};
pub use oracle::RevisionOracle;
