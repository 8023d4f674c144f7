//! Freehand ink stroke.

use super::{InkStyle, Primitive, erase_threshold};
use crate::error::{EngineError, EngineResult};
use crate::geometry::{ShapeBounds, distance_point_to_polyline};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Which tool laid down a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeTool {
    #[default]
    Pen,
    Highlighter,
}

/// A freehand polyline, stored flattened as `x, y, x, y, ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<f64>,
    pub style: InkStyle,
    pub tool: StrokeTool,
}

impl Stroke {
    /// Start a stroke at the pointer-down position.
    pub fn new(start: Point, style: InkStyle, tool: StrokeTool) -> Self {
        Self {
            points: vec![start.x, start.y],
            style,
            tool,
        }
    }

    /// Build a stroke from a flattened coordinate list.
    pub fn from_flat(coords: Vec<f64>, style: InkStyle, tool: StrokeTool) -> EngineResult<Self> {
        if coords.len() % 2 != 0 {
            return Err(EngineError::MalformedPoints(coords.len()));
        }
        Ok(Self {
            points: coords,
            style,
            tool,
        })
    }

    /// Append a point.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point.x);
        self.points.push(point.y);
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The flattened coordinates.
    pub fn coords(&self) -> &[f64] {
        &self.points
    }

    /// Points in drawing order.
    pub fn points(&self) -> Vec<Point> {
        self.points
            .chunks_exact(2)
            .map(|c| Point::new(c[0], c[1]))
            .collect()
    }

    pub fn first_point(&self) -> Option<Point> {
        self.points.get(0..2).map(|c| Point::new(c[0], c[1]))
    }

    pub fn last_point(&self) -> Option<Point> {
        let n = self.points.len();
        (n >= 2).then(|| Point::new(self.points[n - 2], self.points[n - 1]))
    }

    pub fn shape_bounds(&self) -> Option<ShapeBounds> {
        ShapeBounds::from_points(&self.points())
    }
}

impl Primitive for Stroke {
    fn bounds(&self) -> Rect {
        self.shape_bounds().map(|b| b.to_rect()).unwrap_or(Rect::ZERO)
    }

    fn erase_hit(&self, center: Point, radius: f64) -> bool {
        distance_point_to_polyline(center, &self.points()) <= erase_threshold(radius, &self.style)
    }

    fn lasso_samples(&self) -> Vec<Point> {
        self.points()
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let points = self.points();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
        }
        path
    }

    fn style(&self) -> &InkStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut InkStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        for c in self.points.chunks_exact_mut(2) {
            let p = affine * Point::new(c[0], c[1]);
            c[0] = p.x;
            c[1] = p.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(coords: &[f64]) -> Stroke {
        Stroke::from_flat(coords.to_vec(), InkStyle::default(), StrokeTool::Pen).unwrap()
    }

    #[test]
    fn test_add_points() {
        let mut s = Stroke::new(Point::new(1.0, 2.0), InkStyle::default(), StrokeTool::Pen);
        s.add_point(Point::new(10.0, 10.0));
        assert_eq!(s.len(), 2);
        assert_eq!(s.coords(), &[1.0, 2.0, 10.0, 10.0]);
        assert_eq!(s.first_point(), Some(Point::new(1.0, 2.0)));
        assert_eq!(s.last_point(), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_from_flat_rejects_odd() {
        let err = Stroke::from_flat(vec![1.0, 2.0, 3.0], InkStyle::default(), StrokeTool::Pen);
        assert!(matches!(err, Err(EngineError::MalformedPoints(3))));
    }

    #[test]
    fn test_bounds() {
        let s = stroke(&[0.0, 0.0, 100.0, 50.0, 50.0, 100.0]);
        assert_eq!(s.bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_erase_hit_boundary_inclusive() {
        // Eraser radius 10, stroke width 2: threshold is exactly 11.
        let s = stroke(&[0.0, 50.0, 100.0, 50.0]);
        assert!(s.erase_hit(Point::new(50.0, 50.0), 10.0));
        assert!(s.erase_hit(Point::new(50.0, 61.0), 10.0));
        assert!(!s.erase_hit(Point::new(50.0, 61.5), 10.0));
    }

    #[test]
    fn test_single_point_stroke_erase() {
        let s = stroke(&[10.0, 10.0]);
        assert!(s.erase_hit(Point::new(13.0, 14.0), 4.0));
        assert!(!s.erase_hit(Point::new(20.0, 20.0), 4.0));
    }

    #[test]
    fn test_transform_moves_points() {
        let mut s = stroke(&[0.0, 0.0, 10.0, 0.0]);
        s.transform(Affine::translate((1.0, 2.0)) * Affine::scale(3.0));
        assert_eq!(s.coords(), &[1.0, 2.0, 31.0, 2.0]);
    }
}
