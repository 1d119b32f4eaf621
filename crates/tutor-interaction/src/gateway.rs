//! Model gateway contract.
//!
//! The rest of the application depends only on this two-function trait;
//! the concrete backend lives in [`crate::gemini`]. Both calls are
//! stateless and independent: no conversation context is carried between
//! invocations.

use async_trait::async_trait;

use tutor_core::error::{Result, TutorError};

/// An in-memory image payload with a sniffed MIME type.
///
/// Construction is the decode step of the extraction pipeline: bytes that
/// are not a recognizable PNG or JPEG are rejected here, before any
/// gateway call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    data: Vec<u8>,
    mime_type: &'static str,
}

impl ImageData {
    /// Wraps raw upload bytes, sniffing the image format from the header.
    ///
    /// # Errors
    ///
    /// Returns an `Extraction` error when the bytes are not PNG or JPEG.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mime_type = sniff_mime(&data).ok_or_else(|| {
            TutorError::extraction("unsupported image data: expected PNG or JPEG")
        })?;
        Ok(Self { data, mime_type })
    }

    /// The raw image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The sniffed MIME type ("image/png" or "image/jpeg").
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }
}

fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

    if data.starts_with(&PNG_MAGIC) {
        Some("image/png")
    } else if data.starts_with(&JPEG_MAGIC) {
        Some("image/jpeg")
    } else {
        None
    }
}

/// The hosted text/vision model, reduced to the two capabilities the
/// application needs.
///
/// Implementations must not retry: a failed call surfaces as
/// `ModelUnavailable` and the caller decides how to present it.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generates text from a text prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Generates text from a text prompt plus an image.
    async fn generate_from_image(&self, prompt: &str, image: &ImageData) -> Result<String>;
}
