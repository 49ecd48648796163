// Configuration module
// Public interface for configuration loading

pub mod constants;
mod error;
mod loader;
mod settings;

pub use error::ConfigError;
pub use loader::{generate_template, load_config, parse_config};
pub use settings::SearchConfig;
