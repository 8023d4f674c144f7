//! Hold-to-snap: stillness tracking, the hold timer, and turning a held
//! stroke into a shape.

use crate::classify::{ShapeClassifier, ShapeKind};
use crate::geometry::ShapeBounds;
use crate::input::{Duration, Instant};
use crate::shapes::{Shape, Stroke};
use kurbo::Point;

/// A pending hold deadline.
///
/// The timer is a plain value owned by the gesture state that armed it. Any
/// transition out of that state drops it, which is the cancellation; nothing
/// can fire against a stroke that no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldTimer {
    deadline: Instant,
}

impl HoldTimer {
    pub fn arm(now: Instant, duration: Duration) -> Self {
        Self {
            deadline: now + duration,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Tracks the last position where the pointer made real progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldTracker {
    last_position: Point,
    last_time: Instant,
}

impl HoldTracker {
    pub fn new(position: Point, time: Instant) -> Self {
        Self {
            last_position: position,
            last_time: time,
        }
    }

    /// Record a sample. Returns true when the pointer moved further than
    /// `threshold` from the last movement position, which becomes `point`.
    pub fn observe(&mut self, point: Point, time: Instant, threshold: f64) -> bool {
        if self.last_position.distance(point) > threshold {
            self.last_position = point;
            self.last_time = time;
            true
        } else {
            false
        }
    }

    pub fn last_position(&self) -> Point {
        self.last_position
    }

    pub fn last_time(&self) -> Instant {
        self.last_time
    }

    /// Apply one pointer sample to the hold timer.
    ///
    /// Movement cancels a pending timer; whenever no timer is pending
    /// afterwards, a fresh one is armed.
    pub fn track(
        &mut self,
        timer: Option<HoldTimer>,
        point: Point,
        time: Instant,
        threshold: f64,
        duration: Duration,
    ) -> HoldTimer {
        let timer = if self.observe(point, time, threshold) {
            None
        } else {
            timer
        };
        timer.unwrap_or_else(|| HoldTimer::arm(time, duration))
    }
}

/// The result of snapping a held stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapped {
    pub shape: Shape,
    pub kind: ShapeKind,
    /// Fixed point for the live resize: bounds center, or a line's start.
    pub anchor: Point,
    pub bounds: ShapeBounds,
}

/// Classify a held stroke and build the replacement shape.
///
/// `None` keeps the stroke as freehand ink: too few points, a degenerate
/// stroke, or no recognizable kind.
pub fn snap_stroke(stroke: &Stroke, classifier: &ShapeClassifier, min_points: usize) -> Option<Snapped> {
    if stroke.len() < min_points.max(3) {
        return None;
    }
    let points = stroke.points();
    let kind = classifier.classify(&points)?;
    let bounds = ShapeBounds::from_points(&points)?;
    let first = *points.first()?;
    let last = *points.last()?;

    let anchor = match kind {
        ShapeKind::Line => first,
        _ => bounds.center(),
    };
    let shape = Shape::seed(kind, &bounds, first, last, stroke.style.clone());
    Some(Snapped {
        shape,
        kind,
        anchor,
        bounds,
    })
}
