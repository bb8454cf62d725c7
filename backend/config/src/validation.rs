//! Config validation with path-tagged messages.

use crate::env::API_KEY_VARS;
use crate::schema::DefectScanConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
///
/// A missing API key is only a warning: the server still starts and each
/// analysis fails until a key is provided.
pub fn validate(config: &DefectScanConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !config.has_api_key() {
        report.warn(
            "apiKey",
            format!(
                "No API key set (checked {}); analysis calls will fail",
                API_KEY_VARS.join(", ")
            ),
        );
    }
    if config.bind_address.trim().is_empty() {
        report.error("bindAddress", "Bind address cannot be empty");
    }
    if config.model.trim().is_empty() {
        report.error("model", "Model name cannot be empty");
    }
    if !(config.api_base_url.starts_with("https://") || config.api_base_url.starts_with("http://")) {
        report.error("apiBaseUrl", "API base URL must start with http:// or https://");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_warning_only() {
        let report = validate(&DefectScanConfig::default());
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "apiKey");
    }

    #[test]
    fn bad_base_url_is_error() {
        let config = DefectScanConfig {
            api_key: Some("AIza-test-key".into()),
            api_base_url: "generativelanguage.googleapis.com".into(),
            ..DefectScanConfig::default()
        };
        let report = validate(&config);
        assert!(!report.is_valid());
        assert!(report.warnings.is_empty());
        assert_eq!(report.errors[0].path, "apiBaseUrl");
    }
}
