//! Two-finger pinch scaling.

use super::Point;

/// The first two touch points of a multi-touch event.
pub type TouchPair = (Point, Point);

/// Prior distances at or below this are treated as coincident fingers.
const MIN_PINCH_DISTANCE: f64 = f64::EPSILON;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Take the first two touches, if there are at least two.
pub fn two_finger_pair(touches: &[Point]) -> Option<TouchPair> {
    match touches {
        [first, second, ..] => Some((*first, *second)),
        _ => None,
    }
}

/// Scale ratio between a pinch's starting and current finger spread.
///
/// Returns `None` when the starting distance is zero (both fingers landed on
/// the same point) or the result is not finite, so callers leave the image
/// size alone instead of dividing by zero.
pub fn compute_scale(prior: TouchPair, current: TouchPair) -> Option<f64> {
    let prior_distance = distance(prior.0, prior.1);
    if !prior_distance.is_finite() || prior_distance <= MIN_PINCH_DISTANCE {
        return None;
    }

    let ratio = distance(current.0, current.1) / prior_distance;
    ratio.is_finite().then_some(ratio)
}
