//! Geometry helpers shared by the recognizer, eraser and lasso.
//!
//! Collaborators hand points around as flattened `x, y, x, y, ...` lists;
//! internally everything works on `kurbo::Point`.

use crate::error::{EngineError, EngineResult};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Convert a flattened coordinate list into points.
pub fn unflatten(coords: &[f64]) -> EngineResult<Vec<Point>> {
    if coords.len() % 2 != 0 {
        return Err(EngineError::MalformedPoints(coords.len()));
    }
    Ok(coords
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect())
}

/// Flatten points into an `x, y, x, y, ...` list.
pub fn flatten(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Distance from a point to the segment a→b.
pub fn distance_point_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// Minimum distance from a point to a polyline.
///
/// A single point degenerates to point distance; an empty list is infinitely
/// far away.
pub fn distance_point_to_polyline(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| distance_point_to_segment(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Angle in degrees, within `[0, 180]`, between the bearings from `curr` to
/// `prev` and from `curr` to `next`.
///
/// 180° is a straight continuation; values near 0° are a sharp reversal.
pub fn angle_at_vertex(prev: Point, curr: Point, next: Point) -> f64 {
    let to_prev = bearing(prev - curr);
    let to_next = bearing(next - curr);
    let diff = (to_prev - to_next).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}

fn bearing(v: Vec2) -> f64 {
    v.y.atan2(v.x).to_degrees()
}

/// Even-odd ray casting test against a flattened polygon.
///
/// Odd-length lists and polygons with fewer than three vertices contain
/// nothing. Points exactly on an edge follow the parity rule and may land on
/// either side.
pub fn point_in_polygon(point: Point, polygon: &[f64]) -> bool {
    match unflatten(polygon) {
        Ok(vertices) => point_in_polygon_points(point, &vertices),
        Err(_) => false,
    }
}

/// Even-odd ray casting test against polygon vertices.
pub fn point_in_polygon_points(point: Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Total length of a polyline.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Arithmetic mean of a set of points.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / points.len() as f64).to_point())
}

/// Resample a path, treated as closed (last point joined back to the first),
/// at uniform arc-length spacing.
///
/// The spacing is widened when it would produce more than `max_points`
/// samples. The first sample is the first input point; the closing point is
/// not repeated.
pub fn resample_closed(points: &[Point], step: f64, max_points: usize) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut ring = points.to_vec();
    ring.push(points[0]);

    let perimeter = path_length(&ring);
    if perimeter < f64::EPSILON || step.is_nan() || step <= 0.0 {
        return vec![points[0]];
    }
    let step = step.max(perimeter / max_points.max(1) as f64);
    let count = ((perimeter / step).floor() as usize).max(1);
    sample_polyline(&ring, step, count)
}

/// Resample an open polyline at uniform arc-length spacing.
///
/// Both endpoints are kept; the spacing is widened when it would produce
/// more than `max_points` samples.
pub fn resample_open(points: &[Point], step: f64, max_points: usize) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let length = path_length(points);
    if length < f64::EPSILON || step.is_nan() || step <= 0.0 {
        return vec![points[0]];
    }
    let step = step.max(length / (max_points.max(2) - 1) as f64);
    let count = (length / step).floor() as usize + 1;

    let mut samples = sample_polyline(points, step, count);
    let end = points[points.len() - 1];
    if samples.last().is_some_and(|last| last.distance(end) > 1e-6) {
        samples.push(end);
    }
    samples
}

/// `count` points spaced `step` apart along `path`, starting at its first
/// point.
fn sample_polyline(path: &[Point], step: f64, count: usize) -> Vec<Point> {
    let mut samples = Vec::with_capacity(count);
    let mut seg = 0;
    let mut seg_start = 0.0;
    for i in 0..count {
        let target = i as f64 * step;
        while seg + 2 < path.len() && seg_start + path[seg].distance(path[seg + 1]) < target {
            seg_start += path[seg].distance(path[seg + 1]);
            seg += 1;
        }
        let (a, b) = (path[seg], path[seg + 1]);
        let len = a.distance(b);
        let t = if len < f64::EPSILON {
            0.0
        } else {
            ((target - seg_start) / len).clamp(0.0, 1.0)
        };
        samples.push(a.lerp(b, t));
    }
    samples
}

/// Signed sum of heading changes along a polyline, in degrees.
///
/// A stroke drawn once around a loop turns by about ±360°; a straight stroke
/// or a zigzag whose turns cancel out comes out near zero.
pub fn total_turning(points: &[Point]) -> f64 {
    let mut headings = points
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| d.hypot2() > f64::EPSILON)
        .map(bearing);
    let Some(mut previous) = headings.next() else {
        return 0.0;
    };
    let mut total = 0.0;
    for heading in headings {
        total += (heading - previous + 180.0).rem_euclid(360.0) - 180.0;
        previous = heading;
    }
    total
}

/// Axis-aligned bounds of a set of stroke points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ShapeBounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds of the given points, or `None` when there are none.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self::new(first.x, first.y, first.x, first.y);
        Some(points.iter().fold(init, |b, p| {
            Self::new(
                b.min_x.min(p.x),
                b.min_y.min(p.y),
                b.max_x.max(p.x),
                b.max_y.max(p.y),
            )
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Ratio of the longer side to the shorter one.
    ///
    /// Infinite when exactly one side is zero; `None` when both are.
    pub fn aspect_ratio(&self) -> Option<f64> {
        let long = self.width().max(self.height());
        let short = self.width().min(self.height());
        if long < f64::EPSILON {
            None
        } else if short < f64::EPSILON {
            Some(f64::INFINITY)
        } else {
            Some(long / short)
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<Rect> for ShapeBounds {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }
}
