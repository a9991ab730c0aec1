//! Product photos as self-contained data URIs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Could not read image file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Not a base64 image data URI")]
    InvalidDataUri,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Check the bytes decode as an image and wrap them in a data URI.
///
/// The original bytes are kept; decoding only proves they are usable.
pub fn encode_data_uri(bytes: &[u8]) -> Result<String, MediaError> {
    let format = image::guess_format(bytes).map_err(|_| MediaError::UnsupportedFormat)?;
    image::load_from_memory_with_format(bytes, format)?;
    Ok(format!("data:{};base64,{}", format.to_mime_type(), STANDARD.encode(bytes)))
}

/// Read a file and wrap it as a data URI
pub async fn read_data_uri(path: &Path) -> Result<String, MediaError> {
    let bytes = tokio::fs::read(path).await?;
    encode_data_uri(&bytes).map_err(|e| {
        warn!(path = %path.display(), error = %e, "rejected image file");
        e
    })
}

/// Split a data URI into its mime type and raw bytes
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>), MediaError> {
    let rest = uri.strip_prefix("data:").ok_or(MediaError::InvalidDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(MediaError::InvalidDataUri)?;
    let mime = meta.strip_suffix(";base64").ok_or(MediaError::InvalidDataUri)?;
    Ok((mime.to_string(), STANDARD.decode(payload)?))
}

pub fn decode_data_uri(uri: &str) -> Result<DynamicImage, MediaError> {
    let (mime, bytes) = parse_data_uri(uri)?;
    let image = match ImageFormat::from_mime_type(&mime) {
        Some(format) => image::load_from_memory_with_format(&bytes, format)?,
        None => image::load_from_memory(&bytes)?,
    };
    Ok(image)
}
