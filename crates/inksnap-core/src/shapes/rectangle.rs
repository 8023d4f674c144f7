//! Rectangle shape.

use super::{InkStyle, Primitive, affine_scale, distance_to_outline, erase_threshold};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: InkStyle,
}

impl Rectangle {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            style: InkStyle::default(),
        }
    }

    pub fn with_style(mut self, style: InkStyle) -> Self {
        self.style = style;
        self
    }

    /// Keep the anchor at the center: the pointer offset is half the size.
    pub fn resize_around(&mut self, anchor: Point, pointer: Point, min_size: f64) {
        self.width = (2.0 * (pointer.x - anchor.x).abs()).max(min_size);
        self.height = (2.0 * (pointer.y - anchor.y).abs()).max(min_size);
        self.position = Point::new(anchor.x - self.width / 2.0, anchor.y - self.height / 2.0);
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    fn corners(&self) -> [Point; 4] {
        let r = self.as_rect();
        [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ]
    }
}

impl Primitive for Rectangle {
    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn erase_hit(&self, center: Point, radius: f64) -> bool {
        distance_to_outline(center, &self.corners()) <= erase_threshold(radius, &self.style)
    }

    fn lasso_samples(&self) -> Vec<Point> {
        let r = self.as_rect();
        let c = r.center();
        vec![
            c,
            Point::new(r.x0, c.y),
            Point::new(r.x1, c.y),
            Point::new(c.x, r.y0),
            Point::new(c.x, r.y1),
        ]
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn style(&self) -> &InkStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut InkStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let scale = affine_scale(affine);
        self.width *= scale;
        self.height *= scale;
    }
}
