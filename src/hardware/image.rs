//! Captured still image handed back to the consumer.

use base64::Engine as _;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while reading a captured image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The payload could not be decoded.
    #[error("captured image is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}

/// A single still captured from the preview.
///
/// Camera plugins return the picture as base64 text; it is kept in that
/// form and only decoded on request.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Base64-encoded image data.
    data: String,
    /// When the capture resolved.
    captured_at: DateTime<Utc>,
}

impl CapturedImage {
    /// Wraps base64 data as returned by the plugin.
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            captured_at: Utc::now(),
        }
    }

    /// Encodes raw image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_base64(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    /// Returns the base64 payload.
    #[inline]
    pub fn as_base64(&self) -> &str {
        &self.data
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Decodes the payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ImageError> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.data)?)
    }

    /// Builds a `data:` URL suitable for an `<img src>`.
    pub fn data_url(&self, mime: &str) -> String {
        format!("data:{};base64,{}", mime, self.data)
    }

    /// Length of the base64 payload.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the plugin returned no data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("base64_len", &self.data.len())
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        let image = CapturedImage::from_base64("aGVsbG8=");
        assert_eq!(image.data_url("image/png"), "data:image/png;base64,aGVsbG8=");
        assert_eq!(image.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_invalid_base64() {
        let image = CapturedImage::from_base64("not base64!");
        assert!(matches!(image.decode(), Err(ImageError::InvalidEncoding(_))));
    }

    #[test]
    fn test_debug_hides_payload() {
        let image = CapturedImage::from_bytes(&[0u8; 64]);
        let debug = format!("{:?}", image);
        assert!(debug.contains("base64_len"));
        assert!(!debug.contains(image.as_base64()));
    }
}
