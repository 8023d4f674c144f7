//! InkSnap Core Library
//!
//! Stroke capture and shape recognition for handwriting surfaces: freehand
//! ink that snaps into clean shapes on a press-and-hold, erasing, and lasso
//! selection.

pub mod classify;
pub mod config;
pub mod corners;
pub mod engine;
pub mod eraser;
pub mod error;
pub mod geometry;
pub mod input;
pub mod lasso;
pub mod page;
pub mod shapes;
pub mod snap;
pub mod tools;

pub use classify::{ShapeClassifier, ShapeKind};
pub use config::EngineConfig;
pub use corners::{Corner, CornerDetector};
pub use engine::{Gesture, InkEngine, Preview};
pub use eraser::EraserSession;
pub use error::{EngineError, EngineResult};
pub use geometry::ShapeBounds;
pub use input::PointerEvent;
pub use lasso::{LassoPath, Selection};
pub use page::{ContentEvent, Drawable, Element, ElementId, Page, PageId, Role};
pub use shapes::{InkStyle, Primitive, Shape, Stroke, StrokeTool};
pub use tools::ToolKind;
