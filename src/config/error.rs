// Configuration errors
//
// Every variant is fatal for the `bisector` binary: it is logged and the
// process exits with status 1 before any command runs.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}, use -h for help", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error decoding JSON from the configuration file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration must be a JSON object")]
    NotAnObject,

    #[error("missing configuration fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("configuration field has the wrong type ('start', 'end' and 'pass_count' must be integers): {0}")]
    InvalidType(#[source] serde_json::Error),

    #[error("configuration field 'start' ({start}) must be less than 'end' ({end})")]
    InvalidRange { start: i64, end: i64 },

    #[error("configuration field 'pass_count' must be at least 1")]
    InvalidPassCount,

    #[error("configuration field 'env_name' is not a valid environment variable name: {0:?}")]
    InvalidEnvName(String),

    #[error("configuration field 'cmd' must not be empty")]
    EmptyCommand,

    #[error("configuration field 'timeout_secs' must be greater than 0")]
    InvalidTimeout,

    #[error("failed to serialize configuration")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write configuration file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
