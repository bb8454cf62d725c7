//! Environment loading.
//!
//! Values come from the process environment, optionally topped up from a
//! local `.env` file. Process variables always win over the file.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::schema::DefectScanConfig;

/// Variables checked for the Gemini API key, in priority order.
///
/// The hyphenated spelling only works from a `.env` file; shells reject it.
pub const API_KEY_VARS: &[&str] = &[
    "GOOGLE_GEMINI_API_KEY",
    "GOOGLE-GEMINI-API-KEY",
    "GEMINI_API_KEY",
    "GOOGLE_API_KEY",
];

pub const ENV_BIND: &str = "DEFECTSCAN_BIND";
pub const ENV_PORT: &str = "DEFECTSCAN_PORT";
pub const ENV_MODEL: &str = "DEFECTSCAN_MODEL";
pub const ENV_API_BASE: &str = "DEFECTSCAN_API_BASE";
pub const ENV_LOG_DIR: &str = "DEFECTSCAN_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "RUST_LOG";

/// Error raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },

    #[error("failed to read env file {path}: {message}")]
    EnvFile { path: String, message: String },
}

/// First non-empty API key among [`API_KEY_VARS`], with the variable it came from.
pub fn resolve_api_key(env: &HashMap<String, String>) -> Option<(&'static str, String)> {
    API_KEY_VARS.iter().find_map(|var| match env.get(*var) {
        Some(val) if !val.trim().is_empty() => Some((*var, val.trim().to_string())),
        _ => None,
    })
}

fn non_empty(env: &HashMap<String, String>, var: &str) -> Option<String> {
    env.get(var)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Build a config from an explicit variable map (useful for testing).
pub fn from_map(env: &HashMap<String, String>) -> Result<DefectScanConfig, ConfigError> {
    let mut config = DefectScanConfig::default();

    if let Some(bind) = non_empty(env, ENV_BIND) {
        config.bind_address = bind;
    }
    if let Some(port) = non_empty(env, ENV_PORT) {
        config.port = port.parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
            var: ENV_PORT.to_string(),
            value: port.clone(),
            reason: e.to_string(),
        })?;
    }
    if let Some(model) = non_empty(env, ENV_MODEL) {
        config.model = model;
    }
    if let Some(base) = non_empty(env, ENV_API_BASE) {
        config.api_base_url = base;
    }
    if let Some(level) = non_empty(env, ENV_LOG_LEVEL) {
        config.log_level = level;
    }
    config.log_dir = non_empty(env, ENV_LOG_DIR);

    if let Some((var, key)) = resolve_api_key(env) {
        config.api_key = Some(key);
        config.api_key_source = Some(var.to_string());
    }

    Ok(config)
}

/// Read `KEY=VALUE` pairs from an env file. A missing file yields an empty map.
///
/// Lines that fail to parse are skipped with a warning.
pub fn dotenv_vars(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let mut vars = HashMap::new();
    if !path.exists() {
        debug!(path = %path.display(), "No env file found");
        return Ok(vars);
    }

    let iter = dotenvy::from_path_iter(path).map_err(|e| ConfigError::EnvFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unparsable env file line"),
        }
    }

    debug!(path = %path.display(), count = vars.len(), "Loaded env file");
    Ok(vars)
}

/// Process environment as a map. Non-UTF-8 entries are ignored.
pub fn process_vars() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Env file read by [`from_env`], relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Process environment merged over the variables in `dotenv_path`.
pub fn env_vars(dotenv_path: Option<&Path>) -> Result<HashMap<String, String>, ConfigError> {
    let mut env = match dotenv_path {
        Some(path) => dotenv_vars(path)?,
        None => HashMap::new(),
    };
    env.extend(process_vars());
    Ok(env)
}

/// Load configuration from the process environment, topped up from `dotenv_path`.
pub fn load(dotenv_path: Option<&Path>) -> Result<DefectScanConfig, ConfigError> {
    from_map(&env_vars(dotenv_path)?)
}

/// Load configuration from the process environment and `./.env`.
pub fn from_env() -> Result<DefectScanConfig, ConfigError> {
    load(Some(Path::new(DOTENV_FILE)))
}
