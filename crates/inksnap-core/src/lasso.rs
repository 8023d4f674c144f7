//! Lasso selection: free-form polygon capture, the frozen selection, and
//! moving or scaling what it holds.

use crate::config::SelectionConfig;
use crate::geometry::{ShapeBounds, centroid, point_in_polygon_points};
use crate::input::Instant;
use crate::page::{ContentEvent, Drawable, ElementId, Page};
use crate::shapes::Primitive;
use kurbo::{Affine, Point, Rect, Vec2};
use std::collections::HashMap;

/// Polygon being drawn with the select tool.
#[derive(Debug, Clone, PartialEq)]
pub struct LassoPath {
    points: Vec<Point>,
}

impl LassoPath {
    pub fn new(start: Point) -> Self {
        Self { points: vec![start] }
    }

    /// Append a vertex. Samples that do not move are dropped.
    pub fn push(&mut self, point: Point) {
        if let Some(last) = self.points.last() {
            // Unreasonably small delta, skip
            if (point - *last).hypot2() < 1e-10 {
                return;
            }
        }
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Close the polygon and select every content element with a sample
    /// point inside it.
    ///
    /// Returns `None` for fewer than three vertices or an empty catch.
    pub fn finish(self, page: &mut Page, config: &SelectionConfig, now: Instant) -> Option<Selection> {
        if self.points.len() < 3 {
            log::debug!("Lasso dropped with {} point(s)", self.points.len());
            return None;
        }
        let outline = self.points;
        let ids: Vec<ElementId> = page
            .content()
            .filter(|e| {
                e.item
                    .lasso_samples()
                    .into_iter()
                    .any(|p| point_in_polygon_points(p, &outline))
            })
            .map(|e| e.id)
            .collect();
        if ids.is_empty() {
            return None;
        }
        log::debug!("Lasso selected {} element(s)", ids.len());
        Some(Selection::new(page, outline, ids, config, now))
    }
}

/// Animated dash offset for the selection outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchingAnts {
    dash_offset: f64,
    last_tick: Instant,
    speed: f64,
    period: f64,
}

impl MarchingAnts {
    pub fn new(now: Instant, speed: f64, period: f64) -> Self {
        Self {
            dash_offset: 0.0,
            last_tick: now,
            speed,
            period,
        }
    }

    /// Advance by the time elapsed since the last tick.
    pub fn tick(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        if self.period > 0.0 {
            self.dash_offset = (self.dash_offset + self.speed * dt).rem_euclid(self.period);
        }
    }

    pub fn dash_offset(&self) -> f64 {
        self.dash_offset
    }
}

/// A frozen lasso and the elements it caught.
///
/// Selected elements are dimmed while selected; `clear` restores them.
#[derive(Debug, Clone)]
pub struct Selection {
    outline: Vec<Point>,
    ids: Vec<ElementId>,
    original_opacity: HashMap<ElementId, f64>,
    ants: MarchingAnts,
    handle_tolerance: f64,
    min_scale: f64,
}

impl Selection {
    fn new(
        page: &mut Page,
        outline: Vec<Point>,
        ids: Vec<ElementId>,
        config: &SelectionConfig,
        now: Instant,
    ) -> Self {
        let mut original_opacity = HashMap::new();
        for &id in &ids {
            if let Some(element) = page.get_mut(id) {
                let style = element.item.style_mut();
                original_opacity.insert(id, style.opacity);
                style.opacity = config.selected_opacity;
            }
        }
        Self {
            outline,
            ids,
            original_opacity,
            ants: MarchingAnts::new(now, config.dash_speed, config.dash_period),
            handle_tolerance: config.handle_tolerance,
            min_scale: config.min_scale,
        }
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    /// Lasso polygon vertices; the closing edge back to the first is implied.
    pub fn outline(&self) -> &[Point] {
        &self.outline
    }

    pub fn dash_offset(&self) -> f64 {
        self.ants.dash_offset()
    }

    pub fn tick(&mut self, now: Instant) {
        self.ants.tick(now);
    }

    pub fn outline_bounds(&self) -> Rect {
        ShapeBounds::from_points(&self.outline)
            .map(|b| b.to_rect())
            .unwrap_or(Rect::ZERO)
    }

    /// Center used for scaling.
    pub fn center(&self) -> Point {
        centroid(&self.outline).unwrap_or(Point::ZERO)
    }

    /// Position of the scale handle: bottom-right of the outline's bounds.
    pub fn handle_position(&self) -> Point {
        let b = self.outline_bounds();
        Point::new(b.x1, b.y1)
    }

    pub fn hits_handle(&self, point: Point) -> bool {
        self.handle_position().distance(point) <= self.handle_tolerance
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon_points(point, &self.outline)
    }

    /// Start dragging at `point`: the scale handle takes precedence over the
    /// lasso interior. `None` when the point hits neither.
    pub fn begin_drag(&self, page: &Page, point: Point) -> Option<SelectionDrag> {
        let mode = if self.hits_handle(point) {
            DragMode::Scale {
                center: self.center(),
            }
        } else if self.contains(point) {
            DragMode::Move
        } else {
            return None;
        };
        let originals = self
            .ids
            .iter()
            .filter_map(|&id| page.get(id).map(|e| (id, e.item.clone())))
            .collect();
        Some(SelectionDrag {
            mode,
            start: point,
            current: point,
            originals,
            original_outline: self.outline.clone(),
            min_scale: self.min_scale,
        })
    }

    /// Scale the selection around its center by `factor`.
    pub fn scale_by(&mut self, page: &mut Page, factor: f64) {
        let factor = factor.max(self.min_scale);
        let affine = scale_about(self.center(), factor);
        for &id in &self.ids {
            if let Some(element) = page.get_mut(id) {
                let width = element.item.style().width;
                element.item.transform(affine);
                element.item.style_mut().width = width * factor;
            }
        }
        for p in &mut self.outline {
            *p = affine * *p;
        }
        page.emit(ContentEvent::SelectionScaled(self.ids.clone()));
    }

    /// Drop the selection, restoring the elements' opacity.
    pub fn clear(self, page: &mut Page) {
        for (id, opacity) in self.original_opacity {
            if let Some(element) = page.get_mut(id) {
                element.item.style_mut().opacity = opacity;
            }
        }
    }
}

/// What a selection drag does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMode {
    Move,
    Scale { center: Point },
}

/// An in-progress move or scale of the selection.
///
/// Every update recomputes from the elements as they were at drag start, so
/// rounding does not accumulate over a long drag.
#[derive(Debug, Clone)]
pub struct SelectionDrag {
    mode: DragMode,
    start: Point,
    current: Point,
    originals: HashMap<ElementId, Drawable>,
    original_outline: Vec<Point>,
    min_scale: f64,
}

impl SelectionDrag {
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn delta(&self) -> Vec2 {
        self.current - self.start
    }

    /// Scale factor for a scale drag; 1.0 for a move.
    pub fn factor(&self) -> f64 {
        match self.mode {
            DragMode::Move => 1.0,
            DragMode::Scale { center } => {
                let initial = self.start.distance(center);
                if initial < f64::EPSILON {
                    1.0
                } else {
                    (self.current.distance(center) / initial).max(self.min_scale)
                }
            }
        }
    }

    pub fn affine(&self) -> Affine {
        match self.mode {
            DragMode::Move => Affine::translate(self.delta()),
            DragMode::Scale { center } => scale_about(center, self.factor()),
        }
    }

    /// Move the drag to `point` and re-apply it to the page and outline.
    pub fn update(&mut self, selection: &mut Selection, page: &mut Page, point: Point) {
        self.current = point;
        let affine = self.affine();
        let factor = self.factor();
        for (&id, original) in &self.originals {
            if let Some(element) = page.get_mut(id) {
                let mut item = original.clone();
                item.transform(affine);
                item.style_mut().width = original.style().width * factor;
                element.item = item;
            }
        }
        selection.outline = self.original_outline.iter().map(|p| affine * *p).collect();
    }

    /// Abandon the drag, putting the elements and outline back where they
    /// started.
    pub fn cancel(self, selection: &mut Selection, page: &mut Page) {
        for (id, original) in self.originals {
            if let Some(element) = page.get_mut(id) {
                element.item = original;
            }
        }
        selection.outline = self.original_outline;
    }

    /// End the drag and announce the change.
    pub fn finish(self, selection: &Selection, page: &mut Page) {
        if self.current == self.start {
            return;
        }
        let ids = selection.ids.clone();
        match self.mode {
            DragMode::Move => page.emit(ContentEvent::SelectionMoved(ids)),
            DragMode::Scale { .. } => page.emit(ContentEvent::SelectionScaled(ids)),
        }
    }
}

fn scale_about(center: Point, factor: f64) -> Affine {
    Affine::translate(center.to_vec2()) * Affine::scale(factor) * Affine::translate(-center.to_vec2())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Duration;
    use crate::shapes::{Circle, InkStyle, Line, Rectangle, Shape, Stroke, StrokeTool, Triangle};

    fn square_lasso() -> LassoPath {
        let mut lasso = LassoPath::new(Point::new(0.0, 0.0));
        lasso.push(Point::new(100.0, 0.0));
        lasso.push(Point::new(100.0, 100.0));
        lasso.push(Point::new(0.0, 100.0));
        lasso
    }

    fn stroke(coords: &[f64]) -> Stroke {
        Stroke::from_flat(coords.to_vec(), InkStyle::default(), StrokeTool::Pen).unwrap()
    }

    #[test]
    fn test_push_skips_duplicates() {
        let mut lasso = LassoPath::new(Point::new(1.0, 1.0));
        lasso.push(Point::new(1.0, 1.0));
        lasso.push(Point::new(2.0, 1.0));
        assert_eq!(lasso.len(), 2);
    }

    #[test]
    fn test_selects_inside_only() {
        let mut page = Page::new();
        let inside = page.add_content(stroke(&[40.0, 40.0, 60.0, 60.0]));
        let partly = page.add_content(stroke(&[90.0, 50.0, 200.0, 50.0]));
        let outside = page.add_content(stroke(&[150.0, 50.0, 200.0, 60.0]));

        let selection = square_lasso()
            .finish(&mut page, &SelectionConfig::default(), Instant::now())
            .unwrap();
        assert_eq!(selection.ids(), &[inside, partly]);
        assert!(!selection.ids().contains(&outside));
    }

    #[test]
    fn test_shape_sample_points() {
        let mut page = Page::new();
        // Center outside, right extreme inside.
        let circle = page.add_content(Shape::Circle(Circle::new(Point::new(-20.0, 50.0), 30.0)));
        // Only a vertex inside.
        let triangle = page.add_content(Shape::Triangle(Triangle::new(
            Point::new(90.0, 90.0),
            Point::new(200.0, 150.0),
            Point::new(150.0, 200.0),
        )));
        // Midpoint inside, endpoints outside.
        let line = page.add_content(Shape::Line(Line::new(Point::new(-50.0, 50.0), Point::new(150.0, 50.0))));
        // Overlaps the lasso's corner but no sample falls inside.
        let rect = page.add_content(Shape::Rectangle(Rectangle::new(Point::new(-100.0, -100.0), 120.0, 120.0)));

        let selection = square_lasso()
            .finish(&mut page, &SelectionConfig::default(), Instant::now())
            .unwrap();
        assert_eq!(selection.ids(), &[circle, triangle, line]);
        assert!(!selection.ids().contains(&rect));
    }

    #[test]
    fn test_background_not_selected() {
        let mut page = Page::new();
        page.add_background(stroke(&[40.0, 40.0, 60.0, 60.0]));
        let result = square_lasso().finish(&mut page, &SelectionConfig::default(), Instant::now());
        assert!(result.is_none());
    }

    #[test]
    fn test_too_few_points() {
        let mut page = Page::new();
        page.add_content(stroke(&[1.0, 1.0, 2.0, 2.0]));
        let mut lasso = LassoPath::new(Point::ZERO);
        lasso.push(Point::new(100.0, 100.0));
        assert!(lasso.finish(&mut page, &SelectionConfig::default(), Instant::now()).is_none());
    }

    #[test]
    fn test_selection_dims_and_clear_restores() {
        let mut page = Page::new();
        let id = page.add_content(stroke(&[40.0, 40.0, 60.0, 60.0]));
        let config = SelectionConfig::default();
        let selection = square_lasso().finish(&mut page, &config, Instant::now()).unwrap();
        let dimmed = page.get(id).unwrap().item.style().opacity;
        assert!((dimmed - config.selected_opacity).abs() < f64::EPSILON);

        selection.clear(&mut page);
        let restored = page.get(id).unwrap().item.style().opacity;
        assert!((restored - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_move_drag() {
        let mut page = Page::new();
        let id = page.add_content(stroke(&[40.0, 40.0, 60.0, 60.0]));
        let mut selection = square_lasso()
            .finish(&mut page, &SelectionConfig::default(), Instant::now())
            .unwrap();

        let mut drag = selection.begin_drag(&page, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(drag.mode(), DragMode::Move);
        drag.update(&mut selection, &mut page, Point::new(60.0, 50.0));
        drag.update(&mut selection, &mut page, Point::new(70.0, 55.0));

        let moved = page.get(id).unwrap().item.as_stroke().unwrap();
        assert_eq!(moved.coords(), &[60.0, 45.0, 80.0, 65.0]);
        assert_eq!(selection.outline()[0], Point::new(20.0, 5.0));

        drag.finish(&selection, &mut page);
        assert_eq!(page.poll_events(), vec![ContentEvent::SelectionMoved(vec![id])]);
    }

    #[test]
    fn test_scale_drag_from_handle() {
        let mut page = Page::new();
        let id = page.add_content(Shape::Circle(Circle::new(Point::new(50.0, 50.0), 10.0)));
        let mut selection = square_lasso()
            .finish(&mut page, &SelectionConfig::default(), Instant::now())
            .unwrap();
        assert_eq!(selection.handle_position(), Point::new(100.0, 100.0));
        assert_eq!(selection.center(), Point::new(50.0, 50.0));

        assert!(selection.hits_handle(Point::new(105.0, 98.0)));

        let mut drag = selection.begin_drag(&page, Point::new(100.0, 100.0)).unwrap();
        assert!(matches!(drag.mode(), DragMode::Scale { .. }));
        drag.update(&mut selection, &mut page, Point::new(150.0, 150.0));
        assert!((drag.factor() - 2.0).abs() < 1e-9);

        let item = &page.get(id).unwrap().item;
        match item.as_shape().unwrap() {
            Shape::Circle(c) => {
                assert!((c.radius - 20.0).abs() < 1e-9);
                assert!(c.center.distance(Point::new(50.0, 50.0)) < 1e-9);
            }
            other => panic!("expected circle, got {other:?}"),
        }
        assert!((item.style().width - 4.0).abs() < 1e-9);
        assert_eq!(selection.outline_bounds(), Rect::new(-50.0, -50.0, 150.0, 150.0));

        drag.finish(&selection, &mut page);
        assert_eq!(page.poll_events(), vec![ContentEvent::SelectionScaled(vec![id])]);
    }

    #[test]
    fn test_scale_factor_floor() {
        let mut page = Page::new();
        page.add_content(stroke(&[40.0, 40.0, 60.0, 60.0]));
        let mut selection = square_lasso()
            .finish(&mut page, &SelectionConfig::default(), Instant::now())
            .unwrap();
        let mut drag = selection.begin_drag(&page, Point::new(100.0, 100.0)).unwrap();
        drag.update(&mut selection, &mut page, Point::new(50.0, 50.0));
        assert!((drag.factor() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_drag_restores() {
        let mut page = Page::new();
        let id = page.add_content(stroke(&[40.0, 40.0, 60.0, 60.0]));
        let mut selection = square_lasso()
            .finish(&mut page, &SelectionConfig::default(), Instant::now())
            .unwrap();
        let before = page.get(id).unwrap().item.clone();

        let mut drag = selection.begin_drag(&page, Point::new(50.0, 50.0)).unwrap();
        drag.update(&mut selection, &mut page, Point::new(90.0, 10.0));
        drag.cancel(&mut selection, &mut page);

        assert_eq!(page.get(id).unwrap().item, before);
        assert_eq!(selection.outline()[0], Point::ZERO);
        assert!(page.poll_events().is_empty());
    }

    #[test]
    fn test_drag_misses_outside() {
        let mut page = Page::new();
        page.add_content(stroke(&[40.0, 40.0, 60.0, 60.0]));
        let selection = square_lasso()
            .finish(&mut page, &SelectionConfig::default(), Instant::now())
            .unwrap();
        assert!(selection.begin_drag(&page, Point::new(300.0, 300.0)).is_none());
    }

    #[test]
    fn test_scale_by() {
        let mut page = Page::new();
        let id = page.add_content(stroke(&[40.0, 50.0, 60.0, 50.0]));
        let mut selection = square_lasso()
            .finish(&mut page, &SelectionConfig::default(), Instant::now())
            .unwrap();
        selection.scale_by(&mut page, 0.5);

        let item = &page.get(id).unwrap().item;
        assert_eq!(item.as_stroke().unwrap().coords(), &[45.0, 50.0, 55.0, 50.0]);
        assert!((item.style().width - 1.0).abs() < 1e-9);
        assert_eq!(selection.outline_bounds(), Rect::new(25.0, 25.0, 75.0, 75.0));
        assert_eq!(page.poll_events(), vec![ContentEvent::SelectionScaled(vec![id])]);
    }

    #[test]
    fn test_marching_ants_wrap() {
        let t0 = Instant::now();
        let mut ants = MarchingAnts::new(t0, 24.0, 12.0);
        ants.tick(t0 + Duration::from_millis(250));
        assert!((ants.dash_offset() - 6.0).abs() < 1e-9);
        ants.tick(t0 + Duration::from_millis(500));
        assert!(ants.dash_offset().abs() < 1e-9 || (ants.dash_offset() - 12.0).abs() < 1e-9);
        ants.tick(t0 + Duration::from_millis(750));
        assert!((ants.dash_offset() - 6.0).abs() < 1e-9);
    }
}
