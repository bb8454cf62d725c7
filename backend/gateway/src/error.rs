//! Gateway error responses.
//!
//! Faults from the analysis path are not recovered from; they are turned
//! into a JSON error body with a status that says which side failed.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use defectscan_core::DefectError;
use logging::redact_sensitive_data;
use media::MediaError;

#[derive(Debug)]
pub enum AppError {
    /// Malformed request (no file part).
    BadRequest(String),
    /// The multipart body could not be read; carries axum's status (413 past the body limit).
    Upload(StatusCode, String),
    /// Anything raised while decoding or analyzing the upload.
    Analysis(anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
            format!("Upload exceeds the request size limit: {}", err.body_text())
        } else {
            format!("Malformed multipart body: {}", err.body_text())
        };
        AppError::Upload(status, message)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Analysis(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upload(status, _) => *status,
            AppError::Analysis(err) => {
                if let Some(media) = err.downcast_ref::<MediaError>() {
                    return match media {
                        MediaError::TooLarge(..) => StatusCode::PAYLOAD_TOO_LARGE,
                        MediaError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                        MediaError::EncodeFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
                        MediaError::EmptyData | MediaError::DecodeFailed(_) => StatusCode::BAD_REQUEST,
                    };
                }
                match err.downcast_ref::<DefectError>() {
                    Some(DefectError::MissingCredential(_)) => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::BAD_GATEWAY,
                }
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg) | AppError::Upload(_, msg) => msg.clone(),
            AppError::Analysis(err) => redact_sensitive_data(&format!("{err:#}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        warn!(status = status.as_u16(), error = %message, "Request failed");
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_errors_map_to_client_statuses() {
        let err = AppError::from(anyhow::Error::new(MediaError::UnsupportedFormat("image/gif".into())));
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err = AppError::from(anyhow::Error::new(MediaError::TooLarge(10, 5)));
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn provider_errors_map_to_bad_gateway() {
        let err = AppError::from(anyhow::Error::new(DefectError::Provider {
            provider: "gemini".into(),
            status: 429,
            message: "Resource has been exhausted".into(),
        }));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.message().contains("Resource has been exhausted"));
    }

    #[test]
    fn missing_credential_is_unavailable() {
        let err = AppError::from(anyhow::Error::new(DefectError::MissingCredential("K".into())));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn unknown_errors_map_to_bad_gateway() {
        let err = AppError::from(anyhow::anyhow!("connection reset by peer"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.message(), "connection reset by peer");
    }
}
