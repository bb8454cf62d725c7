//! Image upload and analysis endpoint.
//!
//! `POST /api/analyze` takes one image in a multipart form and answers with
//! the model's reply, raw and rendered.

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use defectscan_core::ImageSummary;
use logging::{AnalysisEvent, EventLogger};
use markdown::Renderer;

use crate::error::AppError;
use crate::server::GatewayState;

/// Form field names accepted for the image, in addition to any part with a filename.
const IMAGE_FIELDS: &[&str] = &["image", "file"];

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: String,
    /// Reply text exactly as the provider returned it.
    pub result: String,
    /// `result` rendered as sanitized HTML.
    pub html: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
    pub image: ImageSummary,
}

struct ImageField {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Pull the first image part out of the form; other parts are ignored.
async fn read_image_field(multipart: &mut Multipart) -> Result<ImageField, AppError> {
    while let Some(field) = multipart.next_field().await? {
        let is_image = field.file_name().is_some()
            || field.name().is_some_and(|n| IMAGE_FIELDS.contains(&n));
        if !is_image {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        return Ok(ImageField {
            filename,
            content_type,
            data,
        });
    }

    Err(AppError::BadRequest(
        "No image provided; send one file in an 'image' form field".to_string(),
    ))
}

/// Handler for `POST /api/analyze`
pub async fn analyze_upload(
    State(state): State<GatewayState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let request_id = Uuid::new_v4().to_string();
    let upload = read_image_field(&mut multipart).await?;

    EventLogger::log_event(
        &request_id,
        AnalysisEvent::UploadReceived {
            filename: upload.filename.clone(),
            mime_type: upload.content_type.clone().unwrap_or_default(),
            size_bytes: upload.data.len(),
        },
    );

    let outcome = state
        .analyzer
        .analyze_bytes(&upload.data, upload.content_type.as_deref())
        .await;

    let analysis = match outcome {
        Ok(analysis) => analysis,
        Err(err) => {
            EventLogger::log_event(
                &request_id,
                AnalysisEvent::Failed {
                    error_msg: format!("{err:#}"),
                },
            );
            return Err(AppError::from(err));
        }
    };

    EventLogger::log_event(
        &request_id,
        AnalysisEvent::Completed {
            provider: analysis.provider.clone(),
            model: analysis.model.clone(),
            latency_ms: analysis.latency_ms,
            result_chars: analysis.text.chars().count(),
        },
    );
    debug!(request_id = %request_id, "Rendering analysis result");

    Ok(Json(AnalyzeResponse {
        request_id,
        html: Renderer::to_html(&analysis.text),
        result: analysis.text,
        provider: analysis.provider,
        model: analysis.model,
        latency_ms: analysis.latency_ms,
        image: analysis.image,
    }))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use serde_json::Value;
    use tower::ServiceExt;

    use defectscan_core::{DefectError, INSTRUCTION_TEMPLATE};
    use defectscan_understanding::{DefectAnalyzer, GeminiProvider, MockGenerator};

    use crate::server::{GatewayState, build_router};

    const BOUNDARY: &str = "defectscan-test-boundary";
    const LITERAL: &str = "Defect: No along with Probability of Defect in percentage: 2%";

    fn red_png() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([255, 0, 0])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    fn app_with(mock: Arc<MockGenerator>) -> Router {
        build_router(GatewayState::new(Arc::new(DefectAnalyzer::new(mock)), true))
    }

    fn multipart_request(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn red_png_renders_stubbed_reply_verbatim() {
        let mock = Arc::new(MockGenerator::new("stub").with_response(LITERAL));
        let app = app_with(mock.clone());

        let response = app
            .oneshot(multipart_request("image", "red.png", "image/png", &red_png()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["result"], LITERAL);
        assert_eq!(json["html"].as_str().unwrap().trim_end(), format!("<p>{LITERAL}</p>"));
        assert_eq!(json["image"]["width"], 100);
        assert_eq!(json["image"]["height"], 100);

        let seen = mock.requests().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].instruction(), Some(INSTRUCTION_TEMPLATE));
        let part = seen[0].inline_images().next().unwrap();
        assert_eq!(part.mime_type, "image/jpeg");
        assert_eq!(&part.data[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn generator_failure_is_visible_error() {
        let mock = Arc::new(MockGenerator::new("stub").with_failure(|| {
            anyhow::Error::new(DefectError::Provider {
                provider: "stub".into(),
                status: 429,
                message: "quota exceeded".into(),
            })
        }));

        let response = app_with(mock)
            .oneshot(multipart_request("image", "red.png", "image/png", &red_png()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn missing_key_fails_on_request_not_startup() {
        let provider = GeminiProvider::new(None).with_base_url("http://127.0.0.1:9");
        let state = GatewayState::new(Arc::new(DefectAnalyzer::new(Arc::new(provider))), false);

        let response = build_router(state)
            .oneshot(multipart_request("image", "red.png", "image/png", &red_png()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("GOOGLE_GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn rejects_types_outside_allow_list() {
        let mock = Arc::new(MockGenerator::new("stub"));
        let response = app_with(mock.clone())
            .oneshot(multipart_request("image", "part.gif", "image/gif", b"GIF89a\x01\x00\x01\x00"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn body_over_limit_is_payload_too_large() {
        let mock = Arc::new(MockGenerator::new("stub"));
        let state = GatewayState::new(Arc::new(DefectAnalyzer::new(mock.clone())), true)
            .with_body_limit(16 * 1024);

        let mut oversized = red_png();
        oversized.resize(oversized.len() + 64 * 1024, 0);

        let response = build_router(state)
            .oneshot(multipart_request("image", "big.png", "image/png", &oversized))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("size limit"));
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn form_without_file_is_bad_request() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap();

        let response = app_with(Arc::new(MockGenerator::new("stub")))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn index_and_health_are_served() {
        let app = app_with(Arc::new(MockGenerator::new("stub")));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("Manufacturing"));

        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["provider"], "stub");
        assert_eq!(json["credential_configured"], true);
    }
}
