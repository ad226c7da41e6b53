//! Corner-handle resizing and free movement.
//!
//! Both solvers work from the geometry captured when the drag started rather
//! than the previous tick, so a run of rejected ticks never accumulates error:
//! the next accepted tick lands exactly where the pointer is.

use super::{Bounds, Direction, Point, Rect};

/// Container geometry produced by a resize tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGeometry {
    pub width: f64,
    pub height: f64,
    /// Absolute page position of the container's left edge.
    pub left: f64,
    /// Absolute page position of the container's top edge.
    pub top: f64,
}

impl ResizeGeometry {
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

/// Compute the container geometry for a resize handle dragged to `pointer`.
///
/// # Arguments
///
/// * `direction` - The corner handle that was pressed
/// * `pointer` - Current pointer position (page coordinates)
/// * `start` - Container rectangle at drag start (page coordinates)
/// * `aspect_ratio` - Original image `width / height`
/// * `constrain` - Effective aspect lock for this tick (mode OR modifier key)
/// * `bounds` - Exclusive size limits
///
/// # Returns
///
/// `None` when the candidate size falls outside `bounds`; the caller keeps
/// whatever geometry it already has.
///
/// # Behavior
///
/// The corner opposite the handle stays put. When constrained, height is
/// derived from width for every direction; for the north handles the top
/// edge is also corrected so that the bottom edge stays anchored.
pub fn compute_resize(
    direction: Direction,
    pointer: Point,
    start: &Rect,
    aspect_ratio: f64,
    constrain: bool,
    bounds: &Bounds,
) -> Option<ResizeGeometry> {
    let Point { x, y } = pointer;

    let (width, mut height, left, mut top) = match direction {
        Direction::SouthEast => (x - start.left, y - start.top, start.left, start.top),
        Direction::SouthWest => (
            start.width - (x - start.left),
            y - start.top,
            x,
            start.top,
        ),
        Direction::NorthWest => (
            start.width - (x - start.left),
            start.height - (y - start.top),
            x,
            y,
        ),
        Direction::NorthEast => (
            x - start.left,
            start.height - (y - start.top),
            start.left,
            y,
        ),
    };

    if constrain {
        let constrained_height = width / aspect_ratio;
        if direction.moves_top_edge() {
            // Push the top edge by however much the height grows so the
            // bottom edge does not move.
            top = y - (constrained_height - height);
        }
        height = constrained_height;
    }

    if !bounds.contains(width, height) {
        return None;
    }

    Some(ResizeGeometry {
        width,
        height,
        left,
        top,
    })
}

/// Compute the container position for a move drag.
///
/// The grab point keeps its offset inside the container. Moves are never
/// bounded.
pub fn compute_move(pointer: Point, press: Point, start: &Rect) -> Point {
    Point::new(
        pointer.x - (press.x - start.left),
        pointer.y - (press.y - start.top),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn start() -> Rect {
        Rect::new(100.0, 100.0, 200.0, 150.0)
    }

    fn free(direction: Direction, x: f64, y: f64) -> Option<ResizeGeometry> {
        compute_resize(
            direction,
            Point::new(x, y),
            &start(),
            16.0 / 9.0,
            false,
            &Bounds::default(),
        )
    }

    #[test]
    fn test_south_east_anchors_top_left() {
        let result = compute_resize(
            Direction::SouthEast,
            Point::new(250.0, 300.0),
            &Rect::new(100.0, 100.0, 50.0, 50.0),
            16.0 / 9.0,
            false,
            &Bounds::default(),
        )
        .unwrap();

        assert_eq!(result.width, 150.0);
        assert_eq!(result.height, 200.0);
        assert_eq!(result.left, 100.0);
        assert_eq!(result.top, 100.0);
    }

    #[test]
    fn test_south_east_constrained() {
        let result = compute_resize(
            Direction::SouthEast,
            Point::new(250.0, 300.0),
            &Rect::new(100.0, 100.0, 50.0, 50.0),
            16.0 / 9.0,
            true,
            &Bounds::default(),
        )
        .unwrap();

        assert_eq!(result.width, 150.0);
        assert!((result.height - 84.375).abs() < EPS);
        assert_eq!(result.top, 100.0);
    }

    #[test]
    fn test_south_west_anchors_top_right() {
        // Drag the left edge 40px further left.
        let result = free(Direction::SouthWest, 60.0, 300.0).unwrap();

        assert_eq!(result.width, 240.0);
        assert_eq!(result.height, 200.0);
        assert_eq!(result.left, 60.0);
        assert_eq!(result.top, 100.0);
        // Right edge unchanged
        assert_eq!(result.left + result.width, 300.0);
    }

    #[test]
    fn test_north_west_anchors_bottom_right() {
        let result = free(Direction::NorthWest, 80.0, 70.0).unwrap();

        assert_eq!(result.width, 220.0);
        assert_eq!(result.height, 180.0);
        assert_eq!(result.left, 80.0);
        assert_eq!(result.top, 70.0);
        assert_eq!(result.left + result.width, 300.0);
        assert_eq!(result.top + result.height, 250.0);
    }

    #[test]
    fn test_north_east_anchors_bottom_left() {
        let result = free(Direction::NorthEast, 350.0, 120.0).unwrap();

        assert_eq!(result.width, 250.0);
        assert_eq!(result.height, 130.0);
        assert_eq!(result.left, 100.0);
        assert_eq!(result.top, 120.0);
        assert_eq!(result.top + result.height, 250.0);
    }

    #[test]
    fn test_north_west_constrained_keeps_bottom_edge() {
        let aspect = 2.0;
        let result = compute_resize(
            Direction::NorthWest,
            Point::new(80.0, 70.0),
            &start(),
            aspect,
            true,
            &Bounds::default(),
        )
        .unwrap();

        assert_eq!(result.width, 220.0);
        assert!((result.height - 110.0).abs() < EPS);
        // Unconstrained height would be 180 with top at 70; the constrained
        // height is 70 shorter so the top moves down by 70.
        assert!((result.top - 140.0).abs() < EPS);
        assert!((result.top + result.height - 250.0).abs() < EPS);
    }

    #[test]
    fn test_north_east_constrained_keeps_bottom_edge() {
        let aspect = 1.0;
        let result = compute_resize(
            Direction::NorthEast,
            Point::new(350.0, 120.0),
            &start(),
            aspect,
            true,
            &Bounds::default(),
        )
        .unwrap();

        assert_eq!(result.width, 250.0);
        assert!((result.height - 250.0).abs() < EPS);
        assert!((result.top - 0.0).abs() < EPS);
        assert!((result.top + result.height - 250.0).abs() < EPS);
        assert_eq!(result.left, 100.0);
    }

    #[test]
    fn test_rejects_below_minimum() {
        // width = 140 - 100 = 40 < 60
        assert!(free(Direction::SouthEast, 140.0, 300.0).is_none());
        // height = 150 - 100 = 50 < 60
        assert!(free(Direction::SouthEast, 300.0, 150.0).is_none());
    }

    #[test]
    fn test_rejects_above_maximum() {
        assert!(free(Direction::SouthEast, 900.0, 300.0).is_none());
        assert!(free(Direction::SouthEast, 300.0, 1000.0).is_none());
    }

    #[test]
    fn test_rejects_exact_limits() {
        // width exactly 60
        assert!(free(Direction::SouthEast, 160.0, 300.0).is_none());
        // width exactly 800
        assert!(free(Direction::SouthEast, 900.0, 300.0).is_none());
    }

    #[test]
    fn test_constrain_can_push_height_out_of_bounds() {
        // 150 wide at 16:9 is fine, but at 4:1 it is only 37.5 tall.
        let result = compute_resize(
            Direction::SouthEast,
            Point::new(250.0, 300.0),
            &Rect::new(100.0, 100.0, 50.0, 50.0),
            4.0,
            true,
            &Bounds::default(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_handle_dragged_past_anchor_is_rejected() {
        // Pointer left of the container origin gives a negative width.
        assert!(free(Direction::SouthEast, 50.0, 300.0).is_none());
    }

    #[test]
    fn test_move_keeps_grab_offset() {
        let start = Rect::new(100.0, 100.0, 200.0, 150.0);
        let press = Point::new(150.0, 130.0);

        let moved = compute_move(Point::new(400.0, 30.0), press, &start);
        assert_eq!(moved, Point::new(350.0, 0.0));
    }

    #[test]
    fn test_move_without_motion_is_identity() {
        let start = Rect::new(12.5, -40.0, 10.0, 10.0);
        let press = Point::new(15.0, -35.0);
        assert_eq!(compute_move(press, press, &start), start.origin());
    }

    #[test]
    fn test_resize_geometry_rect() {
        let g = ResizeGeometry {
            width: 1.0,
            height: 2.0,
            left: 3.0,
            top: 4.0,
        };
        assert_eq!(g.rect(), Rect::new(3.0, 4.0, 1.0, 2.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
