// Configuration loader
// Loads and validates the JSON search config, and writes the template

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::constants::{DEFAULT_CONFIG_FILE, REQUIRED_FIELDS};
use super::error::ConfigError;
use super::settings::SearchConfig;

/// Load a search config from `path` and validate it.
pub fn load_config(path: &Path) -> Result<SearchConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let value: Value = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(value)
}

/// Turn an already-decoded JSON value into a validated config.
///
/// Missing fields are reported together before any type checking so the
/// user can fix the file in one pass.
pub fn parse_config(value: Value) -> Result<SearchConfig, ConfigError> {
    let object = value.as_object().ok_or(ConfigError::NotAnObject)?;

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingFields(missing));
    }

    let config: SearchConfig = serde_json::from_value(value).map_err(ConfigError::InvalidType)?;
    config.validate()?;
    Ok(config)
}

/// Write the placeholder config into `dir` and return the file's path.
///
/// An existing file with the same name is overwritten.
pub fn generate_template(dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    let json = to_pretty_json(&SearchConfig::template()).map_err(ConfigError::Serialize)?;

    fs::write(&path, json).map_err(|source| ConfigError::Write {
        path: path.clone(),
        source,
    })?;

    info!("Configuration template generated as '{}'", path.display());
    Ok(path)
}

// Four-space indentation, matching hand-written config files.
fn to_pretty_json(config: &SearchConfig) -> serde_json::Result<String> {
    use serde::Serialize;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
