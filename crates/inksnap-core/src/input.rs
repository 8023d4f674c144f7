//! Timestamped pointer input.

use kurbo::Point;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

/// Pointer event in page-local coordinates.
///
/// The position is optional: some hosts deliver events without a usable
/// position (pointer left the page, coalesced sample). Those are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Option<Point>, time: Instant },
    Move { position: Option<Point>, time: Instant },
    Up { position: Option<Point>, time: Instant },
}

impl PointerEvent {
    pub fn down(position: Point, time: Instant) -> Self {
        Self::Down {
            position: Some(position),
            time,
        }
    }

    pub fn moved(position: Point, time: Instant) -> Self {
        Self::Move {
            position: Some(position),
            time,
        }
    }

    pub fn up(position: Point, time: Instant) -> Self {
        Self::Up {
            position: Some(position),
            time,
        }
    }

    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::Down { position, .. } | Self::Move { position, .. } | Self::Up { position, .. } => {
                position
            }
        }
    }

    pub fn time(&self) -> Instant {
        match *self {
            Self::Down { time, .. } | Self::Move { time, .. } | Self::Up { time, .. } => time,
        }
    }
}
