//! Config defaults.

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8501;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_LOG_LEVEL: &str = "info";
