// CLI module
// Argument definitions and handlers for `bisector` and `bisector-git`

mod args;
mod commands;

pub use args::{BisectorArgs, GitArgs};
pub use commands::{execute_search, run_bisector, run_bisector_git};
