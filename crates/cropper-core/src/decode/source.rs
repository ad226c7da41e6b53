//! Decoding of the original image file.
//!
//! Browsers display JPEGs with their EXIF orientation applied, so the raster
//! is rotated the same way here; otherwise crop rectangles measured on screen
//! would not line up with the pixels.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use super::{DecodeError, DecodedImage};

/// EXIF orientation tag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    MirrorHorizontal,
    Rotate180,
    MirrorVertical,
    /// Mirrored along the top-left to bottom-right diagonal.
    Transpose,
    /// Needs a 90 degree clockwise turn to display upright.
    Rotate90,
    /// Mirrored along the top-right to bottom-left diagonal.
    Transverse,
    /// Needs a 270 degree clockwise turn to display upright.
    Rotate270,
}

impl Orientation {
    /// Map a raw tag value (1-8). Anything else is treated as normal.
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Self::MirrorHorizontal,
            3 => Self::Rotate180,
            4 => Self::MirrorVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }

    /// Read the orientation from an encoded file. Files without EXIF data
    /// or without the tag are `Normal`.
    pub fn read(bytes: &[u8]) -> Self {
        Reader::new()
            .read_from_container(&mut Cursor::new(bytes))
            .ok()
            .and_then(|exif| {
                exif.get_field(Tag::Orientation, In::PRIMARY)?
                    .value
                    .get_uint(0)
            })
            .map(Self::from_exif)
            .unwrap_or_default()
    }

    /// Whether displaying upright swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }

    fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => img,
            Self::MirrorHorizontal => img.fliph(),
            Self::Rotate180 => img.rotate180(),
            Self::MirrorVertical => img.flipv(),
            Self::Transpose => img.rotate90().fliph(),
            Self::Rotate90 => img.rotate90(),
            Self::Transverse => img.rotate270().fliph(),
            Self::Rotate270 => img.rotate270(),
        }
    }
}

/// Decode a JPEG or PNG file into an upright RGB raster.
///
/// # Errors
///
/// `DecodeError::InvalidFormat` for empty input or any other format, and
/// `DecodeError::CorruptedFile` if a JPEG/PNG cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    let format = match reader.format() {
        Some(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => format,
        _ => return Err(DecodeError::InvalidFormat),
    };

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    let orientation = Orientation::read(bytes);
    let decoded = DecodedImage::from(orientation.apply(img).into_rgb8());

    debug!(
        ?format,
        ?orientation,
        rotated = orientation.swaps_dimensions(),
        width = decoded.width,
        height = decoded.height,
        "decoded image"
    );
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_jpeg, encode_png};
    use exif::experimental::Writer;
    use exif::{Field, Value};

    /// Splice an EXIF APP1 segment with the given orientation after the SOI marker.
    fn with_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let field = Field {
            tag: Tag::Orientation,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![orientation]),
        };
        let mut writer = Writer::new();
        writer.push_field(&field);
        let mut tiff = Cursor::new(Vec::new());
        writer.write(&mut tiff, false).unwrap();
        let tiff = tiff.into_inner();

        let segment_len = (2 + 6 + tiff.len()) as u16;
        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&segment_len.to_be_bytes());
        out.extend_from_slice(b"Exif\0\0");
        out.extend_from_slice(&tiff);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_decode_jpeg() {
        let jpeg = encode_jpeg(&[128u8; 8 * 4 * 3], 8, 4, 90).unwrap();
        let img = decode_image(&jpeg).unwrap();

        assert_eq!((img.width, img.height), (8, 4));
        assert_eq!(img.pixels.len(), 8 * 4 * 3);
        assert!(img.pixels.iter().all(|p| p.abs_diff(128) <= 2));
    }

    #[test]
    fn test_decode_png_is_lossless() {
        let pixels = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 10, 20, 30,
        ];
        let img = decode_image(&encode_png(&pixels, 2, 2).unwrap()).unwrap();

        assert_eq!((img.width, img.height), (2, 2));
        assert_eq!(img.pixels, pixels);
    }

    #[test]
    fn test_decode_rejects_other_input() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::InvalidFormat)));
        assert!(matches!(
            decode_image(&[0x00, 0x01, 0x02, 0x03]),
            Err(DecodeError::InvalidFormat)
        ));
        assert!(matches!(
            decode_image(b"GIF89a\x01\x00\x01\x00"),
            Err(DecodeError::InvalidFormat)
        ));
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let jpeg = encode_jpeg(&[50u8; 16 * 16 * 3], 16, 16, 90).unwrap();
        // SOI and JFIF header only
        assert!(matches!(
            decode_image(&jpeg[..20]),
            Err(DecodeError::CorruptedFile(_))
        ));
    }

    #[test]
    fn test_orientation_missing_is_normal() {
        let jpeg = encode_jpeg(&[0u8; 3], 1, 1, 90).unwrap();
        assert_eq!(Orientation::read(&jpeg), Orientation::Normal);
        assert_eq!(Orientation::read(&[0x00, 0x01]), Orientation::Normal);
    }

    #[test]
    fn test_orientation_from_exif() {
        assert_eq!(Orientation::from_exif(1), Orientation::Normal);
        assert_eq!(Orientation::from_exif(6), Orientation::Rotate90);
        assert_eq!(Orientation::from_exif(8), Orientation::Rotate270);
        assert_eq!(Orientation::from_exif(42), Orientation::Normal);
        assert!(Orientation::Rotate90.swaps_dimensions());
        assert!(!Orientation::Rotate180.swaps_dimensions());
    }

    #[test]
    fn test_decode_applies_exif_rotation() {
        let jpeg = encode_jpeg(&[200u8; 16 * 8 * 3], 16, 8, 90).unwrap();
        let rotated = with_orientation(&jpeg, 6);

        assert_eq!(Orientation::read(&rotated), Orientation::Rotate90);
        let img = decode_image(&rotated).unwrap();
        assert_eq!((img.width, img.height), (8, 16));
    }

    #[test]
    fn test_only_quarter_turns_swap_dimensions() {
        let jpeg = encode_jpeg(&[90u8; 6 * 2 * 3], 6, 2, 90).unwrap();
        for tag in 1..=8u16 {
            let orientation = Orientation::from_exif(tag as u32);
            let img = decode_image(&with_orientation(&jpeg, tag)).unwrap();
            let expected = if orientation.swaps_dimensions() { (2, 6) } else { (6, 2) };
            assert_eq!((img.width, img.height), expected, "{orientation:?}");
        }
    }

    #[test]
    fn test_mirror_swaps_columns() {
        let rgb = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let out = Orientation::MirrorHorizontal
            .apply(DynamicImage::ImageRgb8(rgb))
            .into_rgb8();

        assert_eq!(out.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
