//! Circle and ellipse shapes.

use super::{InkStyle, Primitive, affine_scale, erase_threshold};
use kurbo::{Affine, BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub style: InkStyle,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            style: InkStyle::default(),
        }
    }

    pub fn with_style(mut self, style: InkStyle) -> Self {
        self.style = style;
        self
    }

    /// Center on the anchor; the pointer lies on the circumference.
    pub fn resize_around(&mut self, anchor: Point, pointer: Point, min_size: f64) {
        self.center = anchor;
        self.radius = anchor.distance(pointer).max(min_size);
    }
}

impl Primitive for Circle {
    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.radius * 2.0, self.radius * 2.0))
    }

    fn erase_hit(&self, center: Point, radius: f64) -> bool {
        (self.center.distance(center) - self.radius).abs() <= erase_threshold(radius, &self.style)
    }

    fn lasso_samples(&self) -> Vec<Point> {
        cardinal_samples(self.center, self.radius, self.radius)
    }

    fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center, self.radius).to_path(0.1)
    }

    fn style(&self) -> &InkStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut InkStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.center = affine * self.center;
        self.radius *= affine_scale(affine);
    }
}

/// An axis-aligned ellipse (the snapped "oval").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    /// Center point.
    pub center: Point,
    /// Horizontal radius.
    pub radius_x: f64,
    /// Vertical radius.
    pub radius_y: f64,
    pub style: InkStyle,
}

impl Ellipse {
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
            style: InkStyle::default(),
        }
    }

    /// Create an ellipse from a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), rect.width() / 2.0, rect.height() / 2.0)
    }

    pub fn with_style(mut self, style: InkStyle) -> Self {
        self.style = style;
        self
    }

    /// Center on the anchor; pointer offsets become the radii.
    pub fn resize_around(&mut self, anchor: Point, pointer: Point, min_size: f64) {
        self.center = anchor;
        self.radius_x = (pointer.x - anchor.x).abs().max(min_size);
        self.radius_y = (pointer.y - anchor.y).abs().max(min_size);
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center, (self.radius_x, self.radius_y), 0.0)
    }
}

impl Primitive for Ellipse {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.center.x + self.radius_x,
            self.center.y + self.radius_y,
        )
    }

    fn erase_hit(&self, center: Point, radius: f64) -> bool {
        if self.radius_x < f64::EPSILON || self.radius_y < f64::EPSILON {
            return false;
        }
        // Distance in the ellipse's unit space, scaled back by the mean radius.
        let nx = (center.x - self.center.x) / self.radius_x;
        let ny = (center.y - self.center.y) / self.radius_y;
        let normalized = (nx * nx + ny * ny).sqrt();
        let average_radius = (self.radius_x + self.radius_y) / 2.0;
        (normalized - 1.0).abs() * average_radius <= erase_threshold(radius, &self.style)
    }

    fn lasso_samples(&self) -> Vec<Point> {
        cardinal_samples(self.center, self.radius_x, self.radius_y)
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
        self.center = affine * self.center;
        let scale = affine.as_coeffs();
        self.radius_x *= scale[0].abs();
        self.radius_y *= scale[3].abs();
    }
}

/// Center plus the four axis extremes.
fn cardinal_samples(center: Point, rx: f64, ry: f64) -> Vec<Point> {
    vec![
        center,
        Point::new(center.x + rx, center.y),
        Point::new(center.x - rx, center.y),
        Point::new(center.x, center.y + ry),
        Point::new(center.x, center.y - ry),
    ]
}
