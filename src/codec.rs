/// JPEG codec for stored pictures
///
/// This module is the only path between raw frames and persisted payloads:
/// every blob in the database is the output of `encode`, and `decode` must be
/// able to read it back for as long as the database lives. Baseline JPEG keeps
/// that promise: the format is stable and lossy only in pixel content, never
/// in dimensions or decodability.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat};
use thiserror::Error;

use crate::frame::Frame;

/// Codec failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer is not a decodable JPEG (truncated, malformed, or not JPEG at all).
    #[error("not a decodable JPEG: {0}")]
    Corrupt(String),

    /// The frame could not be compressed.
    #[error("JPEG encoding failed: {0}")]
    Encode(String),
}

/// Compress a frame to JPEG at the given quality (1-100).
///
/// Deterministic: the same frame and quality always produce the same bytes.
pub fn encode(frame: &Frame, quality: u8) -> Result<Vec<u8>, CodecError> {
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);

    encoder
        .encode(
            frame.pixels(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CodecError::Encode(e.to_string()))?;

    Ok(jpeg)
}

/// Decode a stored JPEG payload back into an RGB8 frame.
///
/// Truncated or malformed buffers are rejected with `CodecError::Corrupt`;
/// a successful decode always yields a displayable frame.
pub fn decode(bytes: &[u8]) -> Result<Frame, CodecError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(|e| CodecError::Corrupt(e.to_string()))?;

    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width(), rgb.height());

    Ok(Frame::new(width, height, rgb.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A frame with a smooth gradient so the JPEG has realistic content.
    fn gradient(width: u32, height: u32) -> Frame {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width.max(1)) as u8);
                pixels.push((y * 255 / height.max(1)) as u8);
                pixels.push(128);
            }
        }
        Frame::new(width, height, pixels)
    }

    #[test]
    fn test_round_trip_preserves_dimensions() {
        let frame = gradient(64, 48);
        let jpeg = encode(&frame, 80).unwrap();
        let decoded = decode(&jpeg).unwrap();

        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
        assert_eq!(decoded.pixels().len(), 64 * 48 * 3);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let frame = gradient(32, 32);
        assert_eq!(encode(&frame, 80).unwrap(), encode(&frame, 80).unwrap());
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        let jpeg = encode(&gradient(32, 32), 80).unwrap();
        let truncated = &jpeg[..jpeg.len() / 2];

        assert!(matches!(decode(truncated), Err(CodecError::Corrupt(_))));
    }

    #[test]
    fn test_garbage_payload_is_rejected() {
        assert!(matches!(
            decode(b"definitely not a jpeg"),
            Err(CodecError::Corrupt(_))
        ));
        assert!(matches!(decode(&[]), Err(CodecError::Corrupt(_))));
    }
}
