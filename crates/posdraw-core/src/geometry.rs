//! Geometric primitives for element placement.
//!
//! This module provides the geometric types shared by the source records and
//! the draw.io output. Values are carried through unchanged; posdraw never
//! lays anything out on its own.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle anchored at its top-left corner
//!
//! # Coordinate System
//!
//! Both pos and draw.io use screen coordinates:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

use serde::Deserialize;

/// A 2D point representing a position in diagram coordinate space.
///
/// Connector waypoints in pos documents deserialize directly into this type.
///
/// # Examples
///
/// ```
/// # use posdraw_core::geometry::Point;
/// let point = Point::new(10.0, 20.5);
/// assert_eq!(point.x(), 10.0);
/// assert_eq!(point.y(), 20.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }
}

/// A rectangle described by its top-left corner and its size.
///
/// This is the shape of both the pos `props` block and the draw.io
/// `mxGeometry` element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    top_left: Point,
    size: Size,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self { top_left, size }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.top_left.x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.top_left.y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.size.width
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.size.height
    }
}

/// Formats a coordinate the way draw.io files usually carry them.
///
/// Whole numbers print without a fractional part (`100`, not `100.0`);
/// everything else uses the shortest representation that round-trips.
///
/// # Examples
///
/// ```
/// # use posdraw_core::geometry::format_coordinate;
/// assert_eq!(format_coordinate(100.0), "100");
/// assert_eq!(format_coordinate(-12.5), "-12.5");
/// assert_eq!(format_coordinate(0.0), "0");
/// ```
pub fn format_coordinate(value: f64) -> String {
    if value == 0.0 {
        // Avoids printing `-0`.
        return "0".to_string();
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(100.0, 50.0));

        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 50.0);
    }

    #[test]
    fn test_point_deserialize() {
        let point: Point = serde_json::from_str(r#"{"x": 3, "y": 4.5}"#).unwrap();
        assert_eq!(point, Point::new(3.0, 4.5));
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(1.0), "1");
        assert_eq!(format_coordinate(1.25), "1.25");
        assert_eq!(format_coordinate(-0.0), "0");
        assert_eq!(format_coordinate(1234567.0), "1234567");
    }
}
