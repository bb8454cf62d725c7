//! Typed runtime configuration.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// DefectScan runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectScanConfig {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Gemini API key; absence is tolerated until a call is made
    pub api_key: Option<String>,
    /// Variable the key was read from, for diagnostics
    pub api_key_source: Option<String>,
    /// Generation model name
    pub model: String,
    /// Base URL of the generation API
    pub api_base_url: String,
    /// Log level
    pub log_level: String,
    /// Directory for rolling NDJSON logs; console only when unset
    pub log_dir: Option<String>,
}

impl Default for DefectScanConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::DEFAULT_BIND_ADDRESS.to_string(),
            port: defaults::DEFAULT_PORT,
            api_key: None,
            api_key_source: None,
            model: defaults::DEFAULT_MODEL.to_string(),
            api_base_url: defaults::DEFAULT_API_BASE_URL.to_string(),
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

impl DefectScanConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// `bind:port` string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
