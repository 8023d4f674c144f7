//! Ink primitives: freehand strokes and recognized shapes.

mod ellipse;
mod line;
mod rectangle;
mod stroke;
mod triangle;

pub use ellipse::{Circle, Ellipse};
pub use line::Line;
pub use rectangle::Rectangle;
pub use stroke::{Stroke, StrokeTool};
pub use triangle::Triangle;

use crate::classify::ShapeKind;
use crate::geometry::{ShapeBounds, distance_point_to_segment};
use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Color used for elements marked by the eraser.
    pub fn erase_grey() -> Self {
        Self::new(160, 160, 160, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style shared by strokes and shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InkStyle {
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke width.
    pub width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl InkStyle {
    pub fn new(color: SerializableColor, width: f64) -> Self {
        Self {
            color,
            width,
            opacity: 1.0,
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.color.into()
    }

    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        let alpha = (f64::from(self.color.a) * self.opacity.clamp(0.0, 1.0)) as u8;
        Color::from_rgba8(self.color.r, self.color.g, self.color.b, alpha)
    }
}

impl Default for InkStyle {
    fn default() -> Self {
        Self::new(SerializableColor::black(), 2.0)
    }
}

/// Behaviour every drawable primitive provides.
pub trait Primitive {
    /// Bounding box in page coordinates.
    fn bounds(&self) -> Rect;

    /// Whether an eraser circle at `center` touches the primitive's outline.
    /// The stroke's own half width is added to `radius`; touching exactly at
    /// the threshold counts as a hit.
    fn erase_hit(&self, center: Point, radius: f64) -> bool;

    /// Points tested for lasso membership. Any one inside selects the
    /// primitive.
    fn lasso_samples(&self) -> Vec<Point>;

    /// Path representation for rendering.
    fn to_path(&self) -> BezPath;

    fn style(&self) -> &InkStyle;

    fn style_mut(&mut self) -> &mut InkStyle;

    /// Apply an affine transform (translation and uniform scale).
    fn transform(&mut self, affine: Affine);
}

/// Distance threshold for an eraser of the given radius against `style`.
pub(crate) fn erase_threshold(radius: f64, style: &InkStyle) -> f64 {
    radius + style.width / 2.0
}

/// Minimum distance from `point` to the closed polygon through `vertices`.
pub(crate) fn distance_to_outline(point: Point, vertices: &[Point]) -> f64 {
    (0..vertices.len())
        .map(|i| distance_point_to_segment(point, vertices[i], vertices[(i + 1) % vertices.len()]))
        .fold(f64::INFINITY, f64::min)
}

/// A recognized geometric primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Oval(Ellipse),
    Rectangle(Rectangle),
    Triangle(Triangle),
    Line(Line),
}

impl Shape {
    /// Build the initial shape for a snapped stroke.
    ///
    /// Geometry comes from the stroke's bounds; a line instead runs from the
    /// stroke's first point to its last.
    pub fn seed(
        kind: ShapeKind,
        bounds: &ShapeBounds,
        first: Point,
        last: Point,
        style: InkStyle,
    ) -> Self {
        let center = bounds.center();
        let (w, h) = (bounds.width(), bounds.height());
        match kind {
            ShapeKind::Circle => Shape::Circle(Circle::new(center, w.max(h) / 2.0).with_style(style)),
            ShapeKind::Oval => Shape::Oval(Ellipse::new(center, w / 2.0, h / 2.0).with_style(style)),
            ShapeKind::Rectangle => Shape::Rectangle(
                Rectangle::new(Point::new(bounds.min_x, bounds.min_y), w, h).with_style(style),
            ),
            ShapeKind::Triangle => Shape::Triangle(Triangle::from_bounds(bounds).with_style(style)),
            ShapeKind::Line => Shape::Line(Line::new(first, last).with_style(style)),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Oval(_) => ShapeKind::Oval,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Line(_) => ShapeKind::Line,
        }
    }

    /// Recompute geometry from the anchor and the current pointer position.
    ///
    /// Circle, oval, rectangle and triangle stay centered on the anchor; a
    /// line starts at the anchor and ends at the pointer. No dimension drops
    /// below `min_size`.
    pub fn resize(&mut self, anchor: Point, pointer: Point, min_size: f64) {
        match self {
            Shape::Circle(s) => s.resize_around(anchor, pointer, min_size),
            Shape::Oval(s) => s.resize_around(anchor, pointer, min_size),
            Shape::Rectangle(s) => s.resize_around(anchor, pointer, min_size),
            Shape::Triangle(s) => s.resize_around(anchor, pointer, min_size),
            Shape::Line(s) => s.resize_from(anchor, pointer, min_size),
        }
    }

    fn as_primitive(&self) -> &dyn Primitive {
        match self {
            Shape::Circle(s) => s,
            Shape::Oval(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Triangle(s) => s,
            Shape::Line(s) => s,
        }
    }

    fn as_primitive_mut(&mut self) -> &mut dyn Primitive {
        match self {
            Shape::Circle(s) => s,
            Shape::Oval(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Triangle(s) => s,
            Shape::Line(s) => s,
        }
    }
}

impl Primitive for Shape {
    fn bounds(&self) -> Rect {
        self.as_primitive().bounds()
    }

    fn erase_hit(&self, center: Point, radius: f64) -> bool {
        self.as_primitive().erase_hit(center, radius)
    }

    fn lasso_samples(&self) -> Vec<Point> {
        self.as_primitive().lasso_samples()
    }

    fn to_path(&self) -> BezPath {
        self.as_primitive().to_path()
    }

    fn style(&self) -> &InkStyle {
        self.as_primitive().style()
    }

    fn style_mut(&mut self) -> &mut InkStyle {
        self.as_primitive_mut().style_mut()
    }

    fn transform(&mut self, affine: Affine) {
        self.as_primitive_mut().transform(affine);
    }
}

/// Uniform scale factor of an affine made of translation and scale.
pub(crate) fn affine_scale(affine: Affine) -> f64 {
    let coeffs = affine.as_coeffs();
    (coeffs[0].abs() + coeffs[3].abs()) / 2.0
}
