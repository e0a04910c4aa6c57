//! Conversion of encoded images into pixel buffers
//!
//! This module is the boundary between image sources and the extraction
//! engine. Decoding itself is delegated to the `image` crate; this module only
//! unwraps the payload and converts the result to RGBA8.
//!
//! ## Supported Sources
//!
//! - Encoded bytes in any format enabled on the `image` crate
//!   (PNG, JPEG, GIF first frame, WebP, BMP)
//! - `data:image/<format>;base64,<payload>` URIs
//! - Already decoded `image::DynamicImage` values

use base64::Engine as _;
use image::DynamicImage;
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::extraction::PixelBuffer;

/// Prefix every accepted data URI starts with
const DATA_URI_PREFIX: &str = "data:image";

/// Marker separating the media type from a base64 payload
const BASE64_MARKER: &str = ";base64";

/// Where the pixels of an extraction come from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Pixels already decoded by the caller
    Pixels(PixelBuffer),
    /// Encoded image file contents
    Encoded(Vec<u8>),
    /// `data:image/...;base64,...` URI
    DataUri(String),
}

impl ImageSource {
    /// Turn the source into a pixel buffer
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::DecodeFailure` if the payload is malformed
    /// or the image cannot be decoded.
    pub fn into_pixels(self) -> Result<PixelBuffer> {
        match self {
            ImageSource::Pixels(buffer) => Ok(buffer),
            ImageSource::Encoded(bytes) => decode_bytes(&bytes),
            ImageSource::DataUri(uri) => decode_data_uri(&uri),
        }
    }
}

impl From<PixelBuffer> for ImageSource {
    fn from(buffer: PixelBuffer) -> Self {
        ImageSource::Pixels(buffer)
    }
}

/// Convert a decoded image to an RGBA8 pixel buffer
pub fn buffer_from_image(image: &DynamicImage) -> Result<PixelBuffer> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::new(width, height, rgba.into_raw())
}

/// Decode encoded image bytes
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer> {
    if bytes.is_empty() {
        return Err(ExtractionError::decode_message("Image data is empty"));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| ExtractionError::decode("Failed to decode image data", e))?;

    debug!(
        width = image.width(),
        height = image.height(),
        bytes = bytes.len(),
        "Decoded image"
    );

    buffer_from_image(&image)
}

/// Decode a `data:image/<format>;base64,<payload>` URI
pub fn decode_data_uri(uri: &str) -> Result<PixelBuffer> {
    let payload = data_uri_payload(uri)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ExtractionError::decode("Invalid base64 payload in data URI", e))?;
    decode_bytes(&bytes)
}

/// Extract the base64 payload of a data URI with whitespace removed
fn data_uri_payload(uri: &str) -> Result<String> {
    if !uri.starts_with(DATA_URI_PREFIX) {
        return Err(ExtractionError::decode_message("Not an image data URI"));
    }

    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| ExtractionError::decode_message("Data URI has no payload"))?;

    if !header.ends_with(BASE64_MARKER) {
        return Err(ExtractionError::decode_message("Data URI payload is not base64"));
    }

    Ok(payload.chars().filter(|c| !c.is_ascii_whitespace()).collect())
}

/// Check if a string looks like an image data URI
pub fn is_data_uri(uri: &str) -> bool {
    uri.starts_with(DATA_URI_PREFIX)
}
