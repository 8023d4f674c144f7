//! Corner detection on captured strokes.

use crate::config::RecognizerConfig;
use crate::geometry::{angle_at_vertex, path_length};
use kurbo::Point;

/// A detected corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Index of the vertex in the input.
    pub index: usize,
    /// Vertex position.
    pub point: Point,
    /// Angle at the vertex in degrees (smaller is sharper).
    pub angle: f64,
}

/// Finds locations of sharp direction change along a stroke.
///
/// [`detect`](Self::detect) walks the stroke as an implicit closed loop:
/// neighbours wrap around the ends, so the join between the last and first
/// point is examined like any other vertex. [`detect_open`](Self::detect_open)
/// does not wrap and never reports a corner within the look-ahead of either
/// end. Neighbours are sampled at a look-ahead *distance*, converted to an
/// index offset through the stroke's average point spacing.
#[derive(Debug, Clone)]
pub struct CornerDetector {
    angle_threshold: f64,
    min_corner_angle: f64,
    min_points: usize,
    lookahead_factor: f64,
    spacing_factor: f64,
}

impl Default for CornerDetector {
    fn default() -> Self {
        Self::new(&RecognizerConfig::default())
    }
}

impl CornerDetector {
    pub fn new(config: &RecognizerConfig) -> Self {
        Self {
            angle_threshold: config.angle_threshold,
            min_corner_angle: config.min_corner_angle,
            min_points: config.min_corner_points,
            lookahead_factor: config.lookahead_factor,
            spacing_factor: config.corner_spacing_factor,
        }
    }

    /// Look-ahead distance for a stroke with the given bounding size.
    pub fn lookahead_distance(&self, width: f64, height: f64) -> f64 {
        (self.lookahead_factor * width.min(height)).max(1.0)
    }

    /// Detect corners on a closed loop, returned in stroke order.
    pub fn detect(&self, points: &[Point], width: f64, height: f64) -> Vec<Corner> {
        self.detect_with(points, width, height, true)
    }

    /// Detect corners on an open stroke, returned in stroke order.
    pub fn detect_open(&self, points: &[Point], width: f64, height: f64) -> Vec<Corner> {
        self.detect_with(points, width, height, false)
    }

    fn detect_with(&self, points: &[Point], width: f64, height: f64, cyclic: bool) -> Vec<Corner> {
        let n = points.len();
        if n < self.min_points.max(3) {
            return Vec::new();
        }

        let spacing = if cyclic {
            (path_length(points) + points[n - 1].distance(points[0])) / n as f64
        } else {
            path_length(points) / (n - 1) as f64
        };
        if spacing < f64::EPSILON {
            return Vec::new();
        }

        let lookahead = self.lookahead_distance(width, height);
        let k = ((lookahead / spacing).round() as usize).clamp(1, (n - 1) / 2);
        let range = if cyclic { 0..n } else { k..n - k };
        let max_angle = 180.0 - self.angle_threshold;

        let mut candidates: Vec<Corner> = range
            .filter_map(|i| {
                let prev = points[(i + n - k) % n];
                let next = points[(i + k) % n];
                let angle = angle_at_vertex(prev, points[i], next);
                (angle > self.min_corner_angle && angle < max_angle).then_some(Corner {
                    index: i,
                    point: points[i],
                    angle,
                })
            })
            .collect();

        candidates.sort_by(|a, b| a.angle.total_cmp(&b.angle).then(a.index.cmp(&b.index)));

        let min_distance = self.spacing_factor * width.min(height);
        let mut accepted: Vec<Corner> = Vec::new();
        for candidate in candidates {
            if accepted
                .iter()
                .all(|c| c.point.distance(candidate.point) >= min_distance)
            {
                accepted.push(candidate);
            }
        }

        accepted.sort_by_key(|c| c.index);
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{resample_closed, resample_open};

    fn square(size: f64) -> Vec<Point> {
        let outline = [
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ];
        resample_closed(&outline, 1.0, 4096)
    }

    fn circle(radius: f64, samples: usize) -> Vec<Point> {
        (0..samples)
            .map(|i| {
                let t = i as f64 / samples as f64 * std::f64::consts::TAU;
                Point::new(radius + radius * t.cos(), radius + radius * t.sin())
            })
            .collect()
    }

    #[test]
    fn test_short_stroke_has_no_corners() {
        let pts: Vec<Point> = (0..11).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
        assert!(CornerDetector::default().detect(&pts, 100.0, 100.0).is_empty());
    }

    #[test]
    fn test_square_has_four_corners() {
        let corners = CornerDetector::default().detect(&square(100.0), 100.0, 100.0);
        assert_eq!(corners.len(), 4);
        for expected in [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ] {
            assert!(corners.iter().any(|c| c.point.distance(expected) < 3.0));
        }
        assert!(corners.iter().all(|c| (c.angle - 90.0).abs() < 1.0));
    }

    #[test]
    fn test_circle_has_no_corners() {
        let pts = circle(50.0, 90);
        assert!(CornerDetector::default().detect(&pts, 100.0, 100.0).is_empty());
    }

    #[test]
    fn test_corners_are_spatially_distinct() {
        // A jittery double corner: two sharp turns a couple of pixels apart
        // should register once.
        let outline = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(102.0, 2.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let pts = resample_closed(&outline, 1.0, 4096);
        let corners = CornerDetector::default().detect(&pts, 102.0, 100.0);
        assert_eq!(corners.len(), 4);
        let min = 0.15 * 100.0;
        for (i, a) in corners.iter().enumerate() {
            for b in &corners[i + 1..] {
                assert!(a.point.distance(b.point) >= min);
            }
        }
    }

    #[test]
    fn test_open_stroke_ends_are_not_joined() {
        // An L: the cyclic walk sees three corners (the two ends meet the
        // closing chord at 45°), the open walk only the bend.
        let outline = [Point::new(0.0, 0.0), Point::new(0.0, 100.0), Point::new(100.0, 100.0)];
        let pts = resample_open(&outline, 1.0, 4096);
        let detector = CornerDetector::default();

        let open = detector.detect_open(&pts, 100.0, 100.0);
        assert_eq!(open.len(), 1);
        assert!(open[0].point.distance(Point::new(0.0, 100.0)) < 3.0);
        assert!((open[0].angle - 90.0).abs() < 1.0);

        assert_eq!(detector.detect(&pts, 100.0, 100.0).len(), 3);
    }

    #[test]
    fn test_reversal_spike_is_rejected() {
        // Out and back along the same line: the turnaround is ~0°, i.e. noise.
        let mut pts: Vec<Point> = (0..=50).map(|i| Point::new(i as f64 * 2.0, 50.0)).collect();
        pts.extend((0..50).rev().map(|i| Point::new(i as f64 * 2.0, 50.0)));
        assert!(CornerDetector::default().detect(&pts, 100.0, 100.0).is_empty());
    }

    #[test]
    fn test_detection_is_idempotent() {
        let pts = square(80.0);
        let detector = CornerDetector::default();
        let first = detector.detect(&pts, 80.0, 80.0);
        let second = detector.detect(&pts, 80.0, 80.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sampling_rate_does_not_change_result() {
        let outline = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let detector = CornerDetector::default();
        let coarse = detector.detect(&resample_closed(&outline, 2.0, 4096), 100.0, 100.0);
        let fine = detector.detect(&resample_closed(&outline, 0.5, 4096), 100.0, 100.0);
        assert_eq!(coarse.len(), 4);
        assert_eq!(fine.len(), 4);
    }
}
