//! Text extraction from uploaded problem images.

use tracing::info;

use tutor_core::error::{Result, TutorError};

use crate::gateway::{ImageData, ModelGateway};
use crate::prompts;

/// Transcribes the problem statement out of an uploaded image.
///
/// Decoding already happened in [`ImageData::from_bytes`]; this runs the
/// single vision call. Any gateway failure comes back as an `Extraction`
/// error carrying the underlying message, and callers must not run the
/// classify/hint pass on a failed transcription.
pub async fn extract_text(gateway: &dyn ModelGateway, image: &ImageData) -> Result<String> {
    let reply = gateway
        .generate_from_image(prompts::EXTRACTION_PROMPT, image)
        .await
        .map_err(|err| TutorError::extraction(err.to_string()))?;

    let transcription = reply.trim().to_string();
    info!(
        "[Extraction] transcribed {} image ({} chars)",
        image.mime_type(),
        transcription.len()
    );
    Ok(transcription)
}
