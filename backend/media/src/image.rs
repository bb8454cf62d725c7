//! Upload decoding and JPEG re-encoding.
//!
//! Every accepted upload is decoded once and re-encoded as baseline JPEG
//! before it leaves the process. No resizing or other preprocessing.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use defectscan_core::ImageSummary;

use crate::MediaError;
use crate::mime_detect::{is_allowed_upload, sniff_mime_type};

/// Largest upload accepted (200 MiB).
pub const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// JPEG quality used for the outbound buffer.
pub const JPEG_QUALITY: u8 = 75;

/// Raster formats on the upload allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
}

impl UploadFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            UploadFormat::Jpeg => "image/jpeg",
            UploadFormat::Png => "image/png",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            UploadFormat::Jpeg => ImageFormat::Jpeg,
            UploadFormat::Png => ImageFormat::Png,
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(UploadFormat::Jpeg),
            "image/png" => Some(UploadFormat::Png),
            _ => None,
        }
    }
}

/// A decoded upload, held only for the duration of one analysis.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub format: UploadFormat,
    pub image: DynamicImage,
    pub size_bytes: usize,
}

/// JPEG-encoded copy of an upload, ready to be sent inline.
#[derive(Debug, Clone)]
pub struct JpegImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl JpegImage {
    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            width: self.width,
            height: self.height,
            jpeg_bytes: self.bytes.len(),
        }
    }
}

/// Decode raw upload bytes.
///
/// `declared_mime` is the content type the client attached, if any; it must be
/// on the allow-list when present. The actual format is taken from the magic
/// bytes.
pub fn decode_upload(bytes: &[u8], declared_mime: Option<&str>) -> Result<UploadedImage, MediaError> {
    if bytes.is_empty() {
        return Err(MediaError::EmptyData);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(MediaError::TooLarge(bytes.len(), MAX_UPLOAD_BYTES));
    }

    if let Some(declared) = declared_mime {
        if !is_allowed_upload(declared) {
            return Err(MediaError::UnsupportedFormat(declared.to_string()));
        }
    }

    let sniffed = sniff_mime_type(bytes);
    let format = UploadFormat::from_mime(sniffed)
        .ok_or_else(|| MediaError::UnsupportedFormat(sniffed.to_string()))?;

    let image = image::load_from_memory_with_format(bytes, format.image_format())
        .map_err(|e| MediaError::DecodeFailed(e.to_string()))?;

    debug!(
        format = format.mime_type(),
        width = image.width(),
        height = image.height(),
        size_bytes = bytes.len(),
        "Decoded upload"
    );

    Ok(UploadedImage {
        format,
        image,
        size_bytes: bytes.len(),
    })
}

/// Re-encode a decoded image as JPEG. Alpha is dropped.
pub fn to_jpeg(upload: &UploadedImage) -> Result<JpegImage, MediaError> {
    encode_jpeg(&upload.image)
}

/// Encode any decoded image as 8-bit RGB JPEG.
pub fn encode_jpeg(image: &DynamicImage) -> Result<JpegImage, MediaError> {
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
        encoder
            .encode_image(&rgb)
            .map_err(|e| MediaError::EncodeFailed(e.to_string()))?;
    }

    Ok(JpegImage {
        bytes,
        width: rgb.width(),
        height: rgb.height(),
    })
}
