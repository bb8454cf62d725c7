use anyhow::Result;
use async_trait::async_trait;

/// MIME type of every image part sent to a generation endpoint.
pub const JPEG_MIME: &str = "image/jpeg";

/// Trait for hosted multimodal generation endpoints (text + image in, text out).
///
/// The analyzer is written against this seam so the concrete provider can be
/// swapped or stubbed without touching the request-building code.
#[async_trait]
pub trait MultimodalGenerator: Send + Sync {
    /// Provider name (e.g., "gemini", "mock").
    fn name(&self) -> &str;

    /// Model identifier requests are routed to.
    fn model(&self) -> &str;

    /// Submit the ordered parts and return the generated text.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}

/// An image embedded directly in a request, tagged with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One element of a multimodal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineData(InlineImage),
}

/// Ordered list of parts submitted as a single user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub parts: Vec<Part>,
}

impl GenerationRequest {
    /// Instruction text first, then one JPEG image part.
    pub fn instruction_with_jpeg(instruction: &str, jpeg: Vec<u8>) -> Self {
        Self {
            parts: vec![
                Part::Text(instruction.to_string()),
                Part::InlineData(InlineImage {
                    mime_type: JPEG_MIME.to_string(),
                    data: jpeg,
                }),
            ],
        }
    }

    /// First text part, if any.
    pub fn instruction(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            Part::Text(t) => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn inline_images(&self) -> impl Iterator<Item = &InlineImage> {
        self.parts.iter().filter_map(|p| match p {
            Part::InlineData(img) => Some(img),
            _ => None,
        })
    }
}

/// Response from a generation provider.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_with_jpeg_orders_parts() {
        let req = GenerationRequest::instruction_with_jpeg("look", vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(req.parts.len(), 2);
        assert!(matches!(&req.parts[0], Part::Text(t) if t == "look"));
        let images: Vec<_> = req.inline_images().collect();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].mime_type, "image/jpeg");
        assert_eq!(images[0].data, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_instruction_lookup() {
        let req = GenerationRequest { parts: vec![] };
        assert!(req.instruction().is_none());

        let req = GenerationRequest::instruction_with_jpeg("inspect", vec![]);
        assert_eq!(req.instruction(), Some("inspect"));
    }
}
