//! Maps a stroke's geometry to a recognizable shape kind.

use crate::config::RecognizerConfig;
use crate::corners::CornerDetector;
use crate::error::EngineResult;
use crate::geometry::{ShapeBounds, resample_closed, resample_open, total_turning, unflatten};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of primitives a stroke can snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Circle,
    Oval,
    Rectangle,
    Triangle,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Line => "line",
            ShapeKind::Circle => "circle",
            ShapeKind::Oval => "oval",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Triangle => "triangle",
        };
        f.write_str(name)
    }
}

/// Stroke classifier.
///
/// Decision order, first match wins:
/// 1. elongated bounds ⇒ line, without looking at corners,
/// 2. three corners ⇒ triangle, four or more ⇒ rectangle,
/// 3. two corners on a stroke that closes on itself ⇒ triangle,
/// 4. otherwise round: circle or oval by aspect ratio.
///
/// Corners are searched around the closing chord only when the stroke loops:
/// it ends near its start, or its heading turns through at least
/// `loop_turning` degrees. Open strokes such as a Z, L or V keep their ends
/// apart. A U turns through half a revolution, which is indistinguishable
/// from three sides of a rectangle, and is read as one.
#[derive(Debug, Clone)]
pub struct ShapeClassifier {
    config: RecognizerConfig,
    detector: CornerDetector,
}

impl Default for ShapeClassifier {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

impl ShapeClassifier {
    pub fn new(config: RecognizerConfig) -> Self {
        let detector = CornerDetector::new(&config);
        Self { config, detector }
    }

    /// Classify a flattened point list.
    pub fn classify_flat(&self, coords: &[f64]) -> EngineResult<Option<ShapeKind>> {
        Ok(self.classify(&unflatten(coords)?))
    }

    /// Classify stroke points. `None` means the stroke stays freehand.
    pub fn classify(&self, points: &[Point]) -> Option<ShapeKind> {
        if points.len() < 3 {
            return None;
        }
        let bounds = ShapeBounds::from_points(points)?;
        let ratio = bounds.aspect_ratio()?;

        if ratio >= self.config.line_aspect_ratio {
            return Some(ShapeKind::Line);
        }

        let (width, height) = (bounds.width(), bounds.height());
        let step = self.detector.lookahead_distance(width, height) / 3.0;
        let closed = self.is_closed(points, &bounds);
        let looped = closed || total_turning(points).abs() >= self.config.loop_turning;
        let max_points = self.config.max_resample_points;
        let corners = if looped {
            self.detector
                .detect(&resample_closed(points, step, max_points), width, height)
        } else {
            self.detector
                .detect_open(&resample_open(points, step, max_points), width, height)
        };
        log::debug!(
            "Classifier found {} corners (aspect ratio {ratio:.2}, looped: {looped})",
            corners.len()
        );

        match corners.len() {
            3 => return Some(ShapeKind::Triangle),
            n if n >= 4 => return Some(ShapeKind::Rectangle),
            2 if closed => return Some(ShapeKind::Triangle),
            _ => {}
        }

        if ratio < self.config.circle_aspect_ratio {
            Some(ShapeKind::Circle)
        } else {
            Some(ShapeKind::Oval)
        }
    }

    /// Whether the stroke ends close to where it started.
    fn is_closed(&self, points: &[Point], bounds: &ShapeBounds) -> bool {
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => {
                let size = bounds.width().max(bounds.height());
                first.distance(*last) <= self.config.closure_factor * size
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    fn ellipse_points(cx: f64, cy: f64, rx: f64, ry: f64, samples: usize) -> Vec<Point> {
        (0..=samples)
            .map(|i| {
                let t = i as f64 / samples as f64 * TAU;
                Point::new(cx + rx * t.cos(), cy + ry * t.sin())
            })
            .collect()
    }

    #[test]
    fn test_square_path_is_rectangle() {
        let classifier = ShapeClassifier::default();
        let kind = classifier
            .classify_flat(&[0.0, 0.0, 100.0, 0.0, 100.0, 100.0, 0.0, 100.0])
            .unwrap();
        assert_eq!(kind, Some(ShapeKind::Rectangle));
    }

    #[test]
    fn test_wide_closed_rectangle() {
        let classifier = ShapeClassifier::default();
        let pts = [
            Point::new(10.0, 10.0),
            Point::new(210.0, 10.0),
            Point::new(210.0, 110.0),
            Point::new(10.0, 110.0),
            Point::new(10.0, 12.0),
        ];
        assert_eq!(classifier.classify(&pts), Some(ShapeKind::Rectangle));
    }

    #[test]
    fn test_elongated_stroke_is_line() {
        let classifier = ShapeClassifier::default();
        let pts: Vec<Point> = (0..=30)
            .map(|i| Point::new(i as f64 * 10.0, i as f64 / 3.0))
            .collect();
        assert_eq!(classifier.classify(&pts), Some(ShapeKind::Line));
    }

    #[test]
    fn test_line_wins_over_corners() {
        // A zigzag with plenty of sharp corners, but 4:1 bounds.
        let classifier = ShapeClassifier::default();
        let pts: Vec<Point> = (0..=20)
            .map(|i| Point::new(i as f64 * 20.0, if i % 2 == 0 { 0.0 } else { 100.0 }))
            .collect();
        assert_eq!(classifier.classify(&pts), Some(ShapeKind::Line));
    }

    #[test]
    fn test_triangle() {
        let classifier = ShapeClassifier::default();
        let pts = [
            Point::new(50.0, 0.0),
            Point::new(100.0, 86.6),
            Point::new(0.0, 86.6),
            Point::new(50.0, 0.0),
        ];
        assert_eq!(classifier.classify(&pts), Some(ShapeKind::Triangle));
    }

    #[test]
    fn test_closed_two_corner_stroke_is_triangle() {
        // A "D": half circle closed by its diameter. Two corners where the
        // arc meets the diameter, and the stroke ends where it began.
        let classifier = ShapeClassifier::default();
        let mut pts: Vec<Point> = (0..=36)
            .map(|i| {
                let t = PI + i as f64 / 36.0 * PI;
                Point::new(50.0 + 50.0 * t.cos(), 50.0 + 50.0 * t.sin())
            })
            .collect();
        pts.push(Point::new(0.0, 50.0));
        assert_eq!(classifier.classify(&pts), Some(ShapeKind::Triangle));
    }

    #[test]
    fn test_open_arc_stays_round() {
        let classifier = ShapeClassifier::default();
        let pts: Vec<Point> = (0..=36)
            .map(|i| {
                let t = PI + i as f64 / 36.0 * PI;
                Point::new(50.0 + 50.0 * t.cos(), 50.0 + 50.0 * t.sin())
            })
            .collect();
        assert_eq!(classifier.classify(&pts), Some(ShapeKind::Oval));
    }

    #[test]
    fn test_open_zigzags_do_not_close() {
        let classifier = ShapeClassifier::default();
        let z = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
        ];
        let l = [Point::new(0.0, 0.0), Point::new(0.0, 100.0), Point::new(100.0, 100.0)];
        let v = [Point::new(0.0, 0.0), Point::new(50.0, 100.0), Point::new(100.0, 0.0)];
        for pts in [&z[..], &l[..], &v[..]] {
            assert_eq!(classifier.classify(pts), Some(ShapeKind::Circle));
        }
    }

    #[test]
    fn test_open_u_reads_as_rectangle() {
        // Three sides of a square; the same figure as the 4-point square path.
        let classifier = ShapeClassifier::default();
        let u = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
            Point::new(100.0, 0.0),
        ];
        assert_eq!(classifier.classify(&u), Some(ShapeKind::Rectangle));
    }

    #[test]
    fn test_circle() {
        let classifier = ShapeClassifier::default();
        let pts = ellipse_points(100.0, 100.0, 60.0, 60.0, 72);
        assert_eq!(classifier.classify(&pts), Some(ShapeKind::Circle));
    }

    #[test]
    fn test_slightly_squashed_circle_is_still_circle() {
        let classifier = ShapeClassifier::default();
        let pts = ellipse_points(0.0, 0.0, 60.0, 50.0, 72);
        assert_eq!(classifier.classify(&pts), Some(ShapeKind::Circle));
    }

    #[test]
    fn test_oval() {
        let classifier = ShapeClassifier::default();
        let pts = ellipse_points(100.0, 100.0, 75.0, 50.0, 90);
        assert_eq!(classifier.classify(&pts), Some(ShapeKind::Oval));

        let wide = ellipse_points(0.0, 0.0, 120.0, 50.0, 120);
        assert_eq!(classifier.classify(&wide), Some(ShapeKind::Oval));
    }

    #[test]
    fn test_degenerate_input() {
        let classifier = ShapeClassifier::default();
        assert_eq!(classifier.classify(&[Point::ZERO, Point::new(10.0, 10.0)]), None);
        assert_eq!(classifier.classify(&[Point::ZERO; 5]), None);
        assert!(classifier.classify_flat(&[1.0, 2.0, 3.0]).is_err());
    }
}
