use thiserror::Error;

/// Top-level error type for the DefectScan runtime.
#[derive(Debug, Error)]
pub enum DefectError {
    #[error("missing credential: set {0} to call the generation endpoint")]
    MissingCredential(String),

    #[error("generation provider error ({provider}, HTTP {status}): {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("generation provider returned no text ({provider}): {reason}")]
    EmptyResponse { provider: String, reason: String },
}
