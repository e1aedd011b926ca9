use image::{ImageReader, RgbImage};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct DecodeError(pub String);

/// Decodes arbitrary image bytes into an RGB8 buffer, sniffing the format from content.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError("cannot identify image file: empty upload".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError(format!("cannot identify image file: {}", e)))?;

    if reader.format().is_none() {
        return Err(DecodeError(
            "cannot identify image file: unrecognized format".to_string(),
        ));
    }

    let image = reader
        .decode()
        .map_err(|e| DecodeError(format!("cannot decode image: {}", e)))?;

    Ok(image.to_rgb8())
}
