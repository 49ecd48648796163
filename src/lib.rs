// bisector - locate the single point where a command's verdict changes
// Library exports

pub mod cli;
pub mod config;
pub mod logging;
pub mod oracle;
pub mod revision;
pub mod search;
