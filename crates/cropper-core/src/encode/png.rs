//! PNG encoding, for hosts that want a lossless crop.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{validate, EncodeError};

/// Encode RGB pixel data to PNG bytes.
///
/// # Errors
///
/// Same validation as [`encode_jpeg`](super::encode_jpeg).
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(&[0u8; 4 * 4 * 3], 4, 4).unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_png_round_trips_exactly() {
        let pixels: Vec<u8> = (0..5 * 3 * 3).map(|i| (i * 7 % 256) as u8).collect();
        let png = encode_png(&pixels, 5, 3).unwrap();
        let decoded = decode_image(&png).unwrap();

        assert_eq!((decoded.width, decoded.height), (5, 3));
        assert_eq!(decoded.pixels, pixels);
    }

    #[test]
    fn test_encode_png_rejects_bad_input() {
        assert!(matches!(
            encode_png(&[0u8; 5], 1, 2),
            Err(EncodeError::InvalidPixelData {
                expected: 6,
                actual: 5
            })
        ));
        assert!(matches!(
            encode_png(&[], 0, 0),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
