//! Crop extraction.
//!
//! The overlay marks the region to keep. Its position relative to the
//! container is the crop rectangle, expressed in the coordinate space of the
//! image as rendered on screen. Extraction copies that region of the backing
//! raster into a new raster of exactly the overlay's size.
//!
//! # Coordinate System
//!
//! - Crop rectangles are in CSS pixels of the displayed image
//! - (0, 0) is the displayed image's top-left corner
//! - The backing raster may have a different pixel size than the displayed
//!   image (after a pinch), so rectangles are scaled into raster pixels

use crate::decode::DecodedImage;
use crate::error::CropperError;
use crate::geometry::{Point, Rect, Size};

/// Compute the crop rectangle from on-screen geometry.
///
/// `overlay` and `container` are bounding boxes in viewport coordinates;
/// both are shifted by the same page `scroll`, so scrolling cancels out but
/// is still applied for symmetry with every other absolute position.
pub fn crop_rect(overlay: &Rect, container: &Rect, scroll: Point) -> Rect {
    let overlay_abs = overlay.translate(scroll);
    let container_abs = container.translate(scroll);

    Rect::new(
        overlay_abs.left - container_abs.left,
        overlay_abs.top - container_abs.top,
        overlay.width,
        overlay.height,
    )
}

/// Copy the region under `rect` out of `source`.
///
/// # Arguments
///
/// * `source` - Backing raster of the displayed image
/// * `displayed` - Size the image is displayed at, in CSS pixels
/// * `rect` - Crop rectangle in displayed-image coordinates
///
/// # Returns
///
/// A raster of `round(rect.width) x round(rect.height)` pixels. Parts of the
/// rectangle that fall outside the image are left black.
///
/// # Errors
///
/// Returns `CropperError::EmptyCrop` if the rectangle rounds to zero pixels.
pub fn extract_region(
    source: &DecodedImage,
    displayed: Size,
    rect: &Rect,
) -> Result<DecodedImage, CropperError> {
    let (out_width, out_height) = rect.size().to_pixels();
    if out_width == 0 || out_height == 0 {
        return Err(CropperError::EmptyCrop {
            width: rect.width,
            height: rect.height,
        });
    }

    let scale_x = axis_scale(source.width, displayed.width);
    let scale_y = axis_scale(source.height, displayed.height);

    // Source column for every output column, None when off the image
    let columns: Vec<Option<usize>> = (0..out_width)
        .map(|x| sample(rect.left + x as f64, scale_x, source.width))
        .collect();

    let mut output = DecodedImage::blank(out_width, out_height);
    let src_stride = source.width as usize * 3;
    let dst_stride = out_width as usize * 3;

    for y in 0..out_height {
        let Some(src_y) = sample(rect.top + y as f64, scale_y, source.height) else {
            continue;
        };
        let src_row = src_y * src_stride;
        let dst_row = y as usize * dst_stride;

        for (x, src_x) in columns.iter().enumerate() {
            let Some(src_x) = src_x else {
                continue;
            };
            let src_idx = src_row + src_x * 3;
            let dst_idx = dst_row + x * 3;
            output.pixels[dst_idx..dst_idx + 3]
                .copy_from_slice(&source.pixels[src_idx..src_idx + 3]);
        }
    }

    Ok(output)
}

/// Raster pixels per displayed pixel along one axis.
fn axis_scale(pixels: u32, displayed: f64) -> f64 {
    if displayed.is_finite() && displayed > 0.0 {
        pixels as f64 / displayed
    } else {
        1.0
    }
}

/// Nearest raster index for the displayed pixel starting at `pos`.
fn sample(pos: f64, scale: f64, len: u32) -> Option<usize> {
    let index = ((pos + 0.5) * scale).floor();
    if index >= 0.0 && index < len as f64 {
        Some(index as usize)
    } else {
        None
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Output dimensions always equal the overlay's rendered size.
        #[test]
        fn prop_output_matches_overlay(
            (img_w, img_h) in (1u32..=40, 1u32..=40),
            (disp_w, disp_h) in (10.0f64..400.0, 10.0f64..400.0),
            (left, top) in (-50.0f64..400.0, -50.0f64..400.0),
            (w, h) in (1u32..=60, 1u32..=60),
        ) {
            let img = DecodedImage::blank(img_w, img_h);
            let rect = Rect::new(left, top, w as f64, h as f64);
            let out = extract_region(&img, Size::new(disp_w, disp_h), &rect).unwrap();

            prop_assert_eq!(out.width, w);
            prop_assert_eq!(out.height, h);
            prop_assert_eq!(out.pixels.len(), (w * h * 3) as usize);
        }

        /// Property: The crop rectangle does not depend on page scroll.
        #[test]
        fn prop_crop_rect_scroll_independent(
            (ol, ot) in (-500.0f64..500.0, -500.0f64..500.0),
            (cl, ct) in (-500.0f64..500.0, -500.0f64..500.0),
            (sx, sy) in (0.0f64..5000.0, 0.0f64..5000.0),
        ) {
            let overlay = Rect::new(ol, ot, 100.0, 80.0);
            let container = Rect::new(cl, ct, 300.0, 200.0);

            let without = crop_rect(&overlay, &container, Point::default());
            let with = crop_rect(&overlay, &container, Point::new(sx, sy));

            prop_assert!((without.left - with.left).abs() < 1e-6);
            prop_assert!((without.top - with.top).abs() < 1e-6);
            prop_assert_eq!(without.size(), with.size());
        }

        /// Property: Unscaled crops copy pixels from the matching position.
        #[test]
        fn prop_unscaled_pixels_from_original(
            (img_w, img_h) in (10u32..=30, 10u32..=30),
            (left, top) in (0u32..5, 0u32..5),
            (w, h) in (1u32..=5, 1u32..=5),
        ) {
            let pixels: Vec<u8> = (0..img_w * img_h)
                .flat_map(|i| { let v = (i % 251) as u8; [v, v, v] })
                .collect();
            let img = DecodedImage::new(img_w, img_h, pixels);
            let rect = Rect::new(left as f64, top as f64, w as f64, h as f64);
            let out = extract_region(&img, img.size(), &rect).unwrap();

            for y in 0..h {
                for x in 0..w {
                    prop_assert_eq!(out.pixel(x, y), img.pixel(left + x, top + y));
                }
            }
        }
    }
}
