//! Line shape.

use super::{InkStyle, Primitive, erase_threshold};
use crate::geometry::distance_point_to_segment;
use kurbo::{Affine, BezPath, Line as KurboLine, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// A straight segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub style: InkStyle,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            style: InkStyle::default(),
        }
    }

    pub fn with_style(mut self, style: InkStyle) -> Self {
        self.style = style;
        self
    }

    /// Anchor is the fixed start, the pointer drags the end. Shorter than
    /// `min_size` is stretched along the same direction (+x when the pointer
    /// sits on the anchor).
    pub fn resize_from(&mut self, anchor: Point, pointer: Point, min_size: f64) {
        self.start = anchor;
        let delta = pointer - anchor;
        let length = delta.hypot();
        self.end = if length >= min_size {
            pointer
        } else if length < f64::EPSILON {
            anchor + Vec2::new(min_size, 0.0)
        } else {
            anchor + delta * (min_size / length)
        };
    }

    /// Get the midpoint of the line.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Get as a kurbo Line.
    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(self.start, self.end)
    }
}

impl Primitive for Line {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn erase_hit(&self, center: Point, radius: f64) -> bool {
        distance_point_to_segment(center, self.start, self.end) <= erase_threshold(radius, &self.style)
    }

    fn lasso_samples(&self) -> Vec<Point> {
        vec![self.start, self.midpoint(), self.end]
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &InkStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut InkStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.start = affine * self.start;
        self.end = affine * self.end;
    }
}
