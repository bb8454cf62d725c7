//! Defect analyzer: the request builder between an upload and the generator.
//!
//! Re-encodes the image as JPEG, pairs it with the fixed instruction, submits
//! it, and hands back the reply text untouched. Generator errors are returned
//! as-is, with no added context and no retry.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use defectscan_core::{
    AnalysisResult, GenerationRequest, INSTRUCTION_TEMPLATE, MultimodalGenerator,
};
use media::{JpegImage, MediaError, UploadedImage};

/// Build the outbound request for one image.
pub fn build_request(image: &UploadedImage) -> Result<GenerationRequest, MediaError> {
    let jpeg = media::to_jpeg(image)?;
    Ok(request_for(jpeg).0)
}

fn request_for(jpeg: JpegImage) -> (GenerationRequest, defectscan_core::ImageSummary) {
    let summary = jpeg.summary();
    (
        GenerationRequest::instruction_with_jpeg(INSTRUCTION_TEMPLATE, jpeg.bytes),
        summary,
    )
}

pub struct DefectAnalyzer {
    generator: Arc<dyn MultimodalGenerator>,
}

impl DefectAnalyzer {
    pub fn new(generator: Arc<dyn MultimodalGenerator>) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &dyn MultimodalGenerator {
        self.generator.as_ref()
    }

    /// Analyze one decoded image and return the reply text exactly as received.
    pub async fn analyze(&self, image: &UploadedImage) -> Result<String> {
        Ok(self.analyze_detailed(image).await?.text)
    }

    /// Like [`analyze`](Self::analyze), with provider and image metadata attached.
    pub async fn analyze_detailed(&self, image: &UploadedImage) -> Result<AnalysisResult> {
        let image = image.clone();
        let upload_bytes = image.size_bytes;
        let jpeg = off_worker(move || media::to_jpeg(&image)).await?;
        self.submit(jpeg, upload_bytes).await
    }

    /// Decode raw upload bytes, then analyze.
    pub async fn analyze_bytes(
        &self,
        bytes: &[u8],
        declared_mime: Option<&str>,
    ) -> Result<AnalysisResult> {
        let bytes = bytes.to_vec();
        let declared_mime = declared_mime.map(str::to_string);
        let (jpeg, upload_bytes) = off_worker(move || {
            let image = media::decode_upload(&bytes, declared_mime.as_deref())?;
            Ok((media::to_jpeg(&image)?, image.size_bytes))
        })
        .await?;
        self.submit(jpeg, upload_bytes).await
    }

    async fn submit(&self, jpeg: JpegImage, upload_bytes: usize) -> Result<AnalysisResult> {
        let (request, summary) = request_for(jpeg);

        info!(
            provider = self.generator.name(),
            model = self.generator.model(),
            upload_bytes,
            width = summary.width,
            height = summary.height,
            jpeg_bytes = summary.jpeg_bytes,
            "Submitting image for defect analysis"
        );

        let response = self.generator.generate(&request).await?;

        info!(latency_ms = response.latency_ms, chars = response.text.len(), "Analysis complete");

        Ok(AnalysisResult {
            text: response.text,
            provider: response.provider,
            model: response.model,
            latency_ms: response.latency_ms,
            image: summary,
        })
    }
}

/// Run image decode/encode work on the blocking pool.
async fn off_worker<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T, MediaError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await??)
}
