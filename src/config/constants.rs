// Project-wide constants
//
// Centralised here so file names and CLI defaults have one source of truth.
// Import via `use crate::config::constants::*;`.

/// Config file read by `bisector` when `--config` is not given, and the name
/// the template generator writes to.
pub const DEFAULT_CONFIG_FILE: &str = "bisector_cfg.json";

/// File holding the ordered commit ids used to resolve revision ordinals.
pub const DEFAULT_COMMIT_LIST_FILE: &str = "commit_logs";

/// Default test command for `bisector-git`.
pub const DEFAULT_TEST_COMMAND: &str = "make test";

/// Default build command for `bisector-git`.
pub const DEFAULT_BUILD_COMMAND: &str = "ninja -j10";

/// Placeholder values written by `--generate-config`.
pub const TEMPLATE_COMMAND: &str = "python3 test.py";
pub const TEMPLATE_ENV_NAME: &str = "TEST_ENV";
pub const TEMPLATE_START: i64 = 1;
pub const TEMPLATE_END: i64 = 100;
pub const TEMPLATE_PASS_COUNT: u32 = 5;

/// Fields every config file must carry.
pub const REQUIRED_FIELDS: [&str; 5] = ["cmd", "env_name", "start", "end", "pass_count"];
