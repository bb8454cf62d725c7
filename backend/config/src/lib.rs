//! `defectscan-config`: DefectScan runtime configuration.
//!
//! Provides:
//! - Typed config schema with defaults
//! - Environment + `.env` loading, API key alias lookup
//! - Config redaction for safe logging/display
//! - Validation (missing key is a warning, not a startup failure)

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{
    env_vars, from_env, from_map, load, resolve_api_key, ConfigError, API_KEY_VARS, DOTENV_FILE,
};
pub use redact::{mask_secret, redact};
pub use schema::DefectScanConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

/// Validate a loaded config and log every finding.
///
/// Call after the logger is initialised so the findings are recorded.
pub fn log_validation(config: &DefectScanConfig) -> ValidationReport {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    report
}
