use serde::Serialize;

/// Outcome of one analysis, as handed to the front-end.
///
/// `text` is the provider's reply verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
    pub image: ImageSummary,
}

/// Dimensions and encoded size of the JPEG that was sent.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ImageSummary {
    pub width: u32,
    pub height: u32,
    pub jpeg_bytes: usize,
}
