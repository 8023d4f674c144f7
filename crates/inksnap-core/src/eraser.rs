//! Eraser gesture: mark elements touched by the eraser, remove them on release.

use crate::config::EraserConfig;
use crate::page::{ContentEvent, ElementId, Page};
use crate::shapes::{InkStyle, Primitive, SerializableColor};
use kurbo::Point;
use std::collections::HashMap;

/// Transient state of one eraser drag.
///
/// Touched elements are only dimmed and greyed while the drag is in
/// progress. `commit` removes them; `cancel` puts their styles back.
#[derive(Debug, Clone)]
pub struct EraserSession {
    radius: f64,
    preview_opacity: f64,
    /// Marked elements in the order they were hit.
    marked: Vec<ElementId>,
    /// Style of each marked element before it was marked.
    originals: HashMap<ElementId, InkStyle>,
    /// Eraser positions, for drawing the eraser path.
    trail: Vec<Point>,
}

impl EraserSession {
    pub fn new(config: &EraserConfig) -> Self {
        Self {
            radius: config.thickness / 2.0,
            preview_opacity: config.preview_opacity,
            marked: Vec::new(),
            originals: HashMap::new(),
            trail: Vec::new(),
        }
    }

    /// Hit radius of the eraser circle.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn trail(&self) -> &[Point] {
        &self.trail
    }

    pub fn marked(&self) -> &[ElementId] {
        &self.marked
    }

    pub fn is_marked(&self, id: ElementId) -> bool {
        self.originals.contains_key(&id)
    }

    /// Test the eraser at `center` against every unmarked content element and
    /// mark the ones it touches. Returns how many were newly marked.
    pub fn erase_at(&mut self, page: &mut Page, center: Point) -> usize {
        self.trail.push(center);

        let hits: Vec<ElementId> = page
            .content()
            .filter(|e| !self.is_marked(e.id))
            .filter(|e| e.item.erase_hit(center, self.radius))
            .map(|e| e.id)
            .collect();

        for &id in &hits {
            if let Some(element) = page.get_mut(id) {
                let style = element.item.style_mut();
                self.originals.insert(id, style.clone());
                style.opacity = self.preview_opacity;
                style.color = SerializableColor::erase_grey();
                self.marked.push(id);
            }
        }
        hits.len()
    }

    /// Remove every marked element from the page.
    ///
    /// Emits `ContentEvent::Erased` when anything was removed.
    pub fn commit(self, page: &mut Page) -> Vec<ElementId> {
        let removed: Vec<ElementId> = self
            .marked
            .into_iter()
            .filter(|&id| page.remove(id).is_some())
            .collect();
        if !removed.is_empty() {
            log::debug!("Erased {} element(s)", removed.len());
            page.emit(ContentEvent::Erased(removed.clone()));
        }
        removed
    }

    /// Abort the drag and restore the original styles of marked elements.
    pub fn cancel(self, page: &mut Page) {
        for (id, style) in self.originals {
            if let Some(element) = page.get_mut(id) {
                *element.item.style_mut() = style;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Shape, Stroke, StrokeTool};

    fn config() -> EraserConfig {
        EraserConfig {
            thickness: 20.0,
            preview_opacity: 0.3,
        }
    }

    fn horizontal_stroke() -> Stroke {
        Stroke::from_flat(vec![0.0, 50.0, 100.0, 50.0], InkStyle::default(), StrokeTool::Pen).unwrap()
    }

    #[test]
    fn test_marks_touched_stroke() {
        let mut page = Page::new();
        let id = page.add_content(horizontal_stroke());
        let mut session = EraserSession::new(&config());
        assert!((session.radius() - 10.0).abs() < f64::EPSILON);

        assert_eq!(session.erase_at(&mut page, Point::new(50.0, 50.0)), 1);
        assert!(session.is_marked(id));

        // Still on the page, but previewed as erased.
        let style = page.get(id).unwrap().item.style();
        assert!((style.opacity - 0.3).abs() < f64::EPSILON);
        assert_eq!(style.color, SerializableColor::erase_grey());
    }

    #[test]
    fn test_marks_each_element_once() {
        let mut page = Page::new();
        page.add_content(horizontal_stroke());
        let mut session = EraserSession::new(&config());
        assert_eq!(session.erase_at(&mut page, Point::new(50.0, 50.0)), 1);
        assert_eq!(session.erase_at(&mut page, Point::new(60.0, 50.0)), 0);
        assert_eq!(session.marked().len(), 1);
        assert_eq!(session.trail().len(), 2);
    }

    #[test]
    fn test_misses_distant_element() {
        let mut page = Page::new();
        page.add_content(horizontal_stroke());
        let mut session = EraserSession::new(&config());
        assert_eq!(session.erase_at(&mut page, Point::new(50.0, 80.0)), 0);
    }

    #[test]
    fn test_background_untouched() {
        let mut page = Page::new();
        let grid = page.add_background(horizontal_stroke());
        let mut session = EraserSession::new(&config());
        assert_eq!(session.erase_at(&mut page, Point::new(50.0, 50.0)), 0);
        assert!(session.commit(&mut page).is_empty());
        assert!(page.contains(grid));
        assert!(page.poll_events().is_empty());
    }

    #[test]
    fn test_commit_removes_marked() {
        let mut page = Page::new();
        let stroke = page.add_content(horizontal_stroke());
        let circle = page.add_content(Shape::Circle(Circle::new(Point::new(200.0, 200.0), 30.0)));
        let far = page.add_content(Shape::Circle(Circle::new(Point::new(500.0, 500.0), 10.0)));

        let mut session = EraserSession::new(&config());
        session.erase_at(&mut page, Point::new(50.0, 50.0));
        // On the ring of the circle.
        session.erase_at(&mut page, Point::new(230.0, 200.0));

        let removed = session.commit(&mut page);
        assert_eq!(removed, vec![stroke, circle]);
        assert!(!page.contains(stroke));
        assert!(!page.contains(circle));
        assert!(page.contains(far));
        assert_eq!(page.poll_events(), vec![ContentEvent::Erased(vec![stroke, circle])]);
    }

    #[test]
    fn test_cancel_restores_style() {
        let mut page = Page::new();
        let original = InkStyle::new(SerializableColor::new(20, 40, 200, 255), 3.0);
        let id = page.add_content(
            Stroke::from_flat(vec![0.0, 50.0, 100.0, 50.0], original.clone(), StrokeTool::Pen).unwrap(),
        );

        let mut session = EraserSession::new(&config());
        session.erase_at(&mut page, Point::new(50.0, 55.0));
        session.cancel(&mut page);

        assert_eq!(page.get(id).unwrap().item.style(), &original);
        assert!(page.poll_events().is_empty());
    }
}
