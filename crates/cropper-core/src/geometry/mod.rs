//! Pure geometry for the cropper's drag interactions.
//!
//! This module holds the value types shared by every interaction (points,
//! sizes, rectangles, handle directions and size bounds) and the two solvers
//! that turn pointer input into new geometry:
//!
//! - [`resize`] - corner-handle resizing and free movement
//! - [`pinch`] - two-finger scale ratio
//!
//! # Coordinate System
//!
//! - All positions are absolute page coordinates (viewport position plus
//!   page scroll), in CSS pixels
//! - Origin is the top-left corner of the page, y grows downward
//! - Aspect ratio is always `width / height`

mod pinch;
mod resize;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use pinch::{compute_scale, distance, two_finger_pair, TouchPair};
pub use resize::{compute_move, compute_resize, ResizeGeometry};

/// A position in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Multiply both dimensions by `ratio`.
    pub fn scale(self, ratio: f64) -> Self {
        Self::new(self.width * ratio, self.height * ratio)
    }

    /// Width divided by height.
    ///
    /// Returns `None` for a degenerate size where the ratio is meaningless.
    pub fn aspect_ratio(self) -> Option<f64> {
        if self.width > 0.0 && self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }

    /// Round to whole pixels, as a raster surface would allocate them.
    pub fn to_pixels(self) -> (u32, u32) {
        (round_px(self.width), round_px(self.height))
    }
}

fn round_px(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Shift the rectangle by `delta` without changing its size.
    pub fn translate(&self, delta: Point) -> Self {
        Self::new(
            self.left + delta.x,
            self.top + delta.y,
            self.width,
            self.height,
        )
    }
}

/// The corner a resize handle sits on.
///
/// Each direction anchors the opposite corner of the container; the handle's
/// own corner follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Bottom-right handle, anchored at the top-left corner.
    #[serde(rename = "se")]
    SouthEast,
    /// Bottom-left handle, anchored at the top-right corner.
    #[serde(rename = "sw")]
    SouthWest,
    /// Top-left handle, anchored at the bottom-right corner.
    #[serde(rename = "nw")]
    NorthWest,
    /// Top-right handle, anchored at the bottom-left corner.
    #[serde(rename = "ne")]
    NorthEast,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
        Direction::NorthEast,
    ];

    /// The handle tag used in markup (`data-direction`).
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::SouthEast => "se",
            Direction::SouthWest => "sw",
            Direction::NorthWest => "nw",
            Direction::NorthEast => "ne",
        }
    }

    /// True when the handle moves the left edge.
    pub fn moves_left_edge(self) -> bool {
        matches!(self, Direction::SouthWest | Direction::NorthWest)
    }

    /// True when the handle moves the top edge.
    pub fn moves_top_edge(self) -> bool {
        matches!(self, Direction::NorthWest | Direction::NorthEast)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a handle tag is not one of `se`, `sw`, `nw`, `ne`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown resize direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "se" => Ok(Direction::SouthEast),
            "sw" => Ok(Direction::SouthWest),
            "nw" => Ok(Direction::NorthWest),
            "ne" => Ok(Direction::NorthEast),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Size limits for the resized image.
///
/// Limits are exclusive: a width equal to `min_width` is rejected. Each
/// limit left out of the options keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Bounds {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_width: 60.0,
            min_height: 60.0,
            max_width: 800.0,
            max_height: 900.0,
        }
    }
}

impl Bounds {
    pub fn new(min_width: f64, min_height: f64, max_width: f64, max_height: f64) -> Self {
        Self {
            min_width,
            min_height,
            max_width,
            max_height,
        }
    }

    /// Check that a candidate size lies strictly inside the limits.
    ///
    /// NaN never passes.
    pub fn contains(&self, width: f64, height: f64) -> bool {
        width > self.min_width
            && height > self.min_height
            && width < self.max_width
            && height < self.max_height
    }
}
