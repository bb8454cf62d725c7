//! `defectscan analyze`: run one image through the analyzer from the terminal.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use defectscan_core::MultimodalGenerator;
use defectscan_understanding::DefectAnalyzer;
use markdown::Renderer;

use crate::terminal_output::note_error;

/// Analyze the file at `path` and print the result to stdout.
pub async fn run(generator: Arc<dyn MultimodalGenerator>, path: &Path, plain: bool) -> Result<()> {
    match analyze_file(generator, path, plain).await {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(err) => {
            note_error(&format!("{err:#}"));
            Err(err)
        }
    }
}

/// Read, decode and analyze the file, returning the text to print.
pub async fn analyze_file(
    generator: Arc<dyn MultimodalGenerator>,
    path: &Path,
    plain: bool,
) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    // Unknown extensions fall back to the magic bytes.
    let declared = Some(media::detect_mime_type(path)).filter(|m| media::is_image(m));

    let analyzer = DefectAnalyzer::new(generator);
    let result = analyzer.analyze_bytes(&bytes, declared).await?;

    Ok(if plain {
        Renderer::to_plain_text(&result.text)
    } else {
        result.text
    })
}
