//! Gesture state machine: routes pointer input to drawing, hold-to-snap,
//! erasing and lasso selection.

use crate::classify::ShapeClassifier;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::eraser::EraserSession;
use crate::geometry::ShapeBounds;
use crate::input::{Instant, PointerEvent};
use crate::lasso::{DragMode, LassoPath, Selection, SelectionDrag};
use crate::page::{ContentEvent, Page, PageId};
use crate::shapes::{InkStyle, Shape, Stroke};
use crate::snap::{HoldTimer, HoldTracker, snap_stroke};
use crate::tools::{ToolKind, ToolManager};
use kurbo::Point;

/// The gesture in progress.
///
/// Per-gesture resources (the hold timer, the eraser marks, the lasso path)
/// live inside their variant, so replacing the variant releases them.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Laying down ink with no hold timer pending.
    Drawing { stroke: Stroke, tracker: HoldTracker },
    /// Laying down pen ink with a hold timer armed.
    HoldPending {
        stroke: Stroke,
        tracker: HoldTracker,
        timer: HoldTimer,
    },
    /// The stroke snapped; the shape follows the pointer until release.
    ShapeMode {
        shape: Shape,
        anchor: Point,
        bounds: ShapeBounds,
    },
    Erasing(EraserSession),
    Lassoing(LassoPath),
    MovingSelection(SelectionDrag),
    ScalingSelection(SelectionDrag),
}

/// What the host should draw on top of the page for the current gesture.
#[derive(Debug, Clone, Copy)]
pub enum Preview<'a> {
    Stroke(&'a Stroke),
    Shape(&'a Shape),
    Lasso(&'a [Point]),
    Eraser { trail: &'a [Point], radius: f64 },
}

/// Stroke capture and shape recognition for one input surface.
///
/// The engine works on one page at a time. A gesture in progress, or a lasso
/// selection left behind by one, pins the engine to its page: input for any
/// other page is ignored until the host calls [`unload_page`](Self::unload_page)
/// (or [`cancel`](Self::cancel)) with the pinned page, which restores the
/// page's dimmed elements. Hosts that switch pages check
/// [`active_page`](Self::active_page) and unload it first.
#[derive(Debug, Clone)]
pub struct InkEngine {
    config: EngineConfig,
    classifier: ShapeClassifier,
    tools: ToolManager,
    gesture: Gesture,
    selection: Option<Selection>,
    /// Page the current gesture or selection belongs to.
    active_page: Option<PageId>,
}

impl Default for InkEngine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl InkEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: EngineConfig) -> Self {
        Self {
            classifier: ShapeClassifier::new(config.recognizer.clone()),
            config,
            tools: ToolManager::new(),
            gesture: Gesture::Idle,
            selection: None,
            active_page: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn style(&self) -> &InkStyle {
        &self.tools.current_style
    }

    /// Style for ink and shapes started from now on.
    pub fn set_style(&mut self, style: InkStyle) {
        self.tools.current_style = style;
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Page the current gesture or selection belongs to.
    pub fn active_page(&self) -> Option<PageId> {
        self.active_page
    }

    /// Deadline of the pending hold, if any.
    pub fn hold_deadline(&self) -> Option<Instant> {
        match &self.gesture {
            Gesture::HoldPending { timer, .. } => Some(timer.deadline()),
            _ => None,
        }
    }

    /// Whether the host should keep calling `tick`.
    pub fn needs_frame(&self) -> bool {
        matches!(self.gesture, Gesture::HoldPending { .. }) || self.selection.is_some()
    }

    /// The in-progress ink, shape, lasso or eraser path.
    pub fn preview(&self) -> Option<Preview<'_>> {
        match &self.gesture {
            Gesture::Idle | Gesture::MovingSelection(_) | Gesture::ScalingSelection(_) => None,
            Gesture::Drawing { stroke, .. } | Gesture::HoldPending { stroke, .. } => {
                Some(Preview::Stroke(stroke))
            }
            Gesture::ShapeMode { shape, .. } => Some(Preview::Shape(shape)),
            Gesture::Erasing(session) => Some(Preview::Eraser {
                trail: session.trail(),
                radius: session.radius(),
            }),
            Gesture::Lassoing(path) => Some(Preview::Lasso(path.points())),
        }
    }

    /// Switch tools. Changing tool abandons the gesture in progress and
    /// drops the selection.
    pub fn set_tool(&mut self, page: &mut Page, tool: ToolKind) {
        if self.tools.set_tool(tool) {
            log::debug!("Tool changed to {:?}", tool);
            self.cancel(page);
        }
    }

    /// The host is about to drop `page`; release anything tied to it.
    pub fn unload_page(&mut self, page: &mut Page) {
        if self.active_page == Some(page.id) {
            self.cancel(page);
        }
    }

    /// Abandon the gesture in progress and clear the selection.
    ///
    /// Eraser marks and selection dimming are undone, a dragged selection
    /// returns to where it started, and unfinished ink is discarded.
    pub fn cancel(&mut self, page: &mut Page) {
        let gesture = std::mem::take(&mut self.gesture);
        let selection = self.selection.take();
        let active = self.active_page.take();

        if active.is_some_and(|id| id != page.id) {
            log::warn!("Dropping gesture state of a page that is no longer available");
            return;
        }

        match (gesture, selection) {
            (Gesture::Erasing(session), selection) => {
                session.cancel(page);
                if let Some(selection) = selection {
                    selection.clear(page);
                }
            }
            (
                Gesture::MovingSelection(drag) | Gesture::ScalingSelection(drag),
                Some(mut selection),
            ) => {
                drag.cancel(&mut selection, page);
                selection.clear(page);
            }
            (_, Some(selection)) => selection.clear(page),
            (_, None) => {}
        }
    }

    /// Dispatch a timestamped pointer event. Events without a position are
    /// ignored.
    pub fn handle_pointer_event(&mut self, page: &mut Page, event: PointerEvent) {
        let Some(point) = event.position() else {
            return;
        };
        match event {
            PointerEvent::Down { time, .. } => self.handle_press(page, point, time),
            PointerEvent::Move { time, .. } => self.handle_drag(page, point, time),
            PointerEvent::Up { time, .. } => self.handle_release(page, point, time),
        }
    }

    /// Pointer down: start a gesture for the current tool.
    pub fn handle_press(&mut self, page: &mut Page, point: Point, time: Instant) {
        if !self.accepts(page) {
            return;
        }
        if !matches!(self.gesture, Gesture::Idle) {
            log::warn!("Pointer down during an active gesture ignored");
            return;
        }

        let tool = self.tools.current_tool;
        self.gesture = match tool {
            ToolKind::Pen | ToolKind::Highlighter => {
                self.clear_selection(page);
                let Some(stroke_tool) = tool.stroke_tool() else {
                    return;
                };
                let style = self.tools.stroke_style(stroke_tool, &self.config.highlighter);
                Gesture::Drawing {
                    stroke: Stroke::new(point, style, stroke_tool),
                    tracker: HoldTracker::new(point, time),
                }
            }
            ToolKind::Eraser => {
                self.clear_selection(page);
                let mut session = EraserSession::new(&self.config.eraser);
                session.erase_at(page, point);
                Gesture::Erasing(session)
            }
            ToolKind::Select => {
                let drag = match &self.selection {
                    Some(selection) => selection.begin_drag(page, point),
                    None => None,
                };
                match drag {
                    Some(drag) if matches!(drag.mode(), DragMode::Move) => Gesture::MovingSelection(drag),
                    Some(drag) => Gesture::ScalingSelection(drag),
                    None => {
                        self.clear_selection(page);
                        Gesture::Lassoing(LassoPath::new(point))
                    }
                }
            }
        };
        self.active_page = Some(page.id);
    }

    /// Pointer move: extend, resize, erase or drag.
    pub fn handle_drag(&mut self, page: &mut Page, point: Point, time: Instant) {
        if !self.accepts(page) {
            return;
        }
        let hold = &self.config.hold;
        let snaps = self.tools.current_tool.snaps_shapes();

        self.gesture = match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Gesture::Idle,
            Gesture::Drawing {
                mut stroke,
                mut tracker,
            } => {
                stroke.add_point(point);
                if snaps {
                    let timer = tracker.track(
                        None,
                        point,
                        time,
                        hold.stillness_threshold,
                        hold.hold_duration(),
                    );
                    Gesture::HoldPending {
                        stroke,
                        tracker,
                        timer,
                    }
                } else {
                    Gesture::Drawing { stroke, tracker }
                }
            }
            Gesture::HoldPending {
                mut stroke,
                mut tracker,
                timer,
            } => {
                stroke.add_point(point);
                let timer = tracker.track(
                    Some(timer),
                    point,
                    time,
                    hold.stillness_threshold,
                    hold.hold_duration(),
                );
                Gesture::HoldPending {
                    stroke,
                    tracker,
                    timer,
                }
            }
            Gesture::ShapeMode {
                mut shape,
                anchor,
                bounds,
            } => {
                shape.resize(anchor, point, self.config.resize.min_size);
                Gesture::ShapeMode {
                    shape,
                    anchor,
                    bounds,
                }
            }
            Gesture::Erasing(mut session) => {
                session.erase_at(page, point);
                Gesture::Erasing(session)
            }
            Gesture::Lassoing(mut path) => {
                path.push(point);
                Gesture::Lassoing(path)
            }
            Gesture::MovingSelection(mut drag) => {
                if let Some(selection) = self.selection.as_mut() {
                    drag.update(selection, page, point);
                }
                Gesture::MovingSelection(drag)
            }
            Gesture::ScalingSelection(mut drag) => {
                if let Some(selection) = self.selection.as_mut() {
                    drag.update(selection, page, point);
                }
                Gesture::ScalingSelection(drag)
            }
        };
    }

    /// Pointer up: commit whatever the gesture produced.
    pub fn handle_release(&mut self, page: &mut Page, point: Point, time: Instant) {
        if !self.accepts(page) {
            return;
        }

        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Drawing { mut stroke, .. } | Gesture::HoldPending { mut stroke, .. } => {
                if stroke.last_point() != Some(point) {
                    stroke.add_point(point);
                }
                let id = page.add_content(stroke);
                page.emit(ContentEvent::StrokeAdded(id));
            }
            Gesture::ShapeMode { shape, .. } => {
                let id = page.add_content(shape);
                page.emit(ContentEvent::ShapeAdded(id));
            }
            Gesture::Erasing(mut session) => {
                session.erase_at(page, point);
                session.commit(page);
            }
            Gesture::Lassoing(mut path) => {
                path.push(point);
                self.selection = path.finish(page, &self.config.selection, time);
            }
            Gesture::MovingSelection(mut drag) | Gesture::ScalingSelection(mut drag) => {
                if let Some(selection) = self.selection.as_mut() {
                    drag.update(selection, page, point);
                    drag.finish(selection, page);
                }
            }
        }

        if self.selection.is_none() {
            self.active_page = None;
        }
    }

    /// Advance time: fire a due hold timer and animate the selection outline.
    pub fn tick(&mut self, page: &mut Page, now: Instant) {
        if self.active_page != Some(page.id) {
            return;
        }
        if self.hold_deadline().is_some_and(|deadline| now >= deadline) {
            self.fire_hold();
        }
        if let Some(selection) = self.selection.as_mut() {
            selection.tick(now);
        }
    }

    fn fire_hold(&mut self) {
        self.gesture = match std::mem::take(&mut self.gesture) {
            Gesture::HoldPending { stroke, tracker, .. } => {
                match snap_stroke(&stroke, &self.classifier, self.config.hold.min_stroke_points) {
                    Some(snapped) => {
                        log::debug!("Hold recognized a {}", snapped.kind);
                        Gesture::ShapeMode {
                            shape: snapped.shape,
                            anchor: snapped.anchor,
                            bounds: snapped.bounds,
                        }
                    }
                    None => {
                        log::debug!("Hold recognized no shape; keeping ink");
                        Gesture::Drawing { stroke, tracker }
                    }
                }
            }
            other => other,
        };
    }

    /// Scale the current selection around its center.
    ///
    /// Returns false when there is nothing selected on `page` or a drag is
    /// in progress.
    pub fn scale_selection(&mut self, page: &mut Page, factor: f64) -> bool {
        if self.active_page != Some(page.id) || !matches!(self.gesture, Gesture::Idle) {
            return false;
        }
        match self.selection.as_mut() {
            Some(selection) => {
                selection.scale_by(page, factor);
                true
            }
            None => false,
        }
    }

    fn clear_selection(&mut self, page: &mut Page) {
        if let Some(selection) = self.selection.take() {
            selection.clear(page);
        }
    }

    /// Input for a page other than the one holding the active gesture or
    /// selection is rejected.
    fn accepts(&self, page: &Page) -> bool {
        match self.active_page {
            Some(id) if id != page.id => {
                log::warn!(
                    "Ignoring input for page {} while page {} is active; unload it first",
                    page.id,
                    id
                );
                false
            }
            _ => true,
        }
    }
}
