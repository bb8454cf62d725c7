//! Upload handling: allow-list checks, decoding, and JPEG re-encoding.

use thiserror::Error;

pub mod image;
pub mod mime_detect;

pub use self::image::{
    JPEG_QUALITY, JpegImage, MAX_UPLOAD_BYTES, UploadFormat, UploadedImage, decode_upload,
    encode_jpeg, to_jpeg,
};
pub use mime_detect::{ALLOWED_EXTENSIONS, detect_mime_type, is_allowed_upload, is_image, sniff_mime_type};

/// Errors raised while turning an upload into an outbound JPEG.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Unsupported image format: {0} (accepted: jpg, jpeg, png)")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode JPEG: {0}")]
    EncodeFailed(String),
}
