//! Triangle shape.

use super::{InkStyle, Primitive, distance_to_outline, erase_threshold};
use crate::geometry::{ShapeBounds, centroid};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A triangle given by its three vertices.
///
/// Snapped triangles are isosceles: apex at the top center of their bounds,
/// base along the bottom edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point; 3],
    pub style: InkStyle,
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Self {
            vertices: [a, b, c],
            style: InkStyle::default(),
        }
    }

    /// Isosceles triangle filling the given bounds.
    pub fn from_bounds(bounds: &ShapeBounds) -> Self {
        let center = bounds.center();
        Self::new(
            Point::new(center.x, bounds.min_y),
            Point::new(bounds.max_x, bounds.max_y),
            Point::new(bounds.min_x, bounds.max_y),
        )
    }

    pub fn with_style(mut self, style: InkStyle) -> Self {
        self.style = style;
        self
    }

    /// Mirror the pointer offset around the anchor so the anchor stays the
    /// center of the triangle's bounds.
    pub fn resize_around(&mut self, anchor: Point, pointer: Point, min_size: f64) {
        let half_w = (pointer.x - anchor.x).abs().max(min_size / 2.0);
        let half_h = (pointer.y - anchor.y).abs().max(min_size / 2.0);
        self.vertices = [
            Point::new(anchor.x, anchor.y - half_h),
            Point::new(anchor.x + half_w, anchor.y + half_h),
            Point::new(anchor.x - half_w, anchor.y + half_h),
        ];
    }
}

impl Primitive for Triangle {
    fn bounds(&self) -> Rect {
        ShapeBounds::from_points(&self.vertices)
            .map(|b| b.to_rect())
            .unwrap_or(Rect::ZERO)
    }

    fn erase_hit(&self, center: Point, radius: f64) -> bool {
        distance_to_outline(center, &self.vertices) <= erase_threshold(radius, &self.style)
    }

    fn lasso_samples(&self) -> Vec<Point> {
        let mut samples = Vec::with_capacity(4);
        samples.extend(centroid(&self.vertices));
        samples.extend(self.vertices);
        samples
    }

    fn to_path(&self) -> BezPath {
        let [a, b, c] = self.vertices;
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        path.line_to(c);
        path.close_path();
        path
    }

    fn style(&self) -> &InkStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut InkStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        for vertex in &mut self.vertices {
            *vertex = affine * *vertex;
        }
    }
}
