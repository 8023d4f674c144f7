//! Page content: the drawable elements the engine reads and mutates.

use crate::shapes::{InkStyle, Primitive, Shape, Stroke};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for page elements.
pub type ElementId = Uuid;

/// Unique identifier for pages.
pub type PageId = Uuid;

/// What an element is for.
///
/// Only `Content` takes part in erasing and lasso selection; background
/// decoration (grid, ruling, dots) is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Content,
    Background,
}

/// A finalized stroke or shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Drawable {
    Stroke(Stroke),
    Shape(Shape),
}

impl Drawable {
    fn as_primitive(&self) -> &dyn Primitive {
        match self {
            Drawable::Stroke(s) => s,
            Drawable::Shape(s) => s,
        }
    }

    fn as_primitive_mut(&mut self) -> &mut dyn Primitive {
        match self {
            Drawable::Stroke(s) => s,
            Drawable::Shape(s) => s,
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Drawable::Shape(s) => Some(s),
            Drawable::Stroke(_) => None,
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Drawable::Stroke(s) => Some(s),
            Drawable::Shape(_) => None,
        }
    }
}

impl Primitive for Drawable {
    fn bounds(&self) -> Rect {
        self.as_primitive().bounds()
    }

    fn erase_hit(&self, center: Point, radius: f64) -> bool {
        self.as_primitive().erase_hit(center, radius)
    }

    fn lasso_samples(&self) -> Vec<Point> {
        self.as_primitive().lasso_samples()
    }

    fn to_path(&self) -> BezPath {
        self.as_primitive().to_path()
    }

    fn style(&self) -> &InkStyle {
        self.as_primitive().style()
    }

    fn style_mut(&mut self) -> &mut InkStyle {
        self.as_primitive_mut().style_mut()
    }

    fn transform(&mut self, affine: Affine) {
        self.as_primitive_mut().transform(affine);
    }
}

impl From<Stroke> for Drawable {
    fn from(stroke: Stroke) -> Self {
        Drawable::Stroke(stroke)
    }
}

impl From<Shape> for Drawable {
    fn from(shape: Shape) -> Self {
        Drawable::Shape(shape)
    }
}

/// An element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub role: Role,
    pub item: Drawable,
}

impl Element {
    pub fn is_content(&self) -> bool {
        self.role == Role::Content
    }
}

/// Notification that committed content changed, so the owner can schedule
/// persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    StrokeAdded(ElementId),
    ShapeAdded(ElementId),
    Erased(Vec<ElementId>),
    SelectionMoved(Vec<ElementId>),
    SelectionScaled(Vec<ElementId>),
}

/// A page's drawable elements in z-order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    /// All elements, keyed by ID.
    elements: HashMap<ElementId, Element>,
    /// Z-order of elements (back to front).
    z_order: Vec<ElementId>,
    /// Pending change notifications.
    #[serde(skip)]
    events: Vec<ContentEvent>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Create a new empty page.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            elements: HashMap::new(),
            z_order: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Add an element on top of the z-order.
    pub fn add(&mut self, role: Role, item: impl Into<Drawable>) -> ElementId {
        let id = Uuid::new_v4();
        self.z_order.push(id);
        self.elements.insert(
            id,
            Element {
                id,
                role,
                item: item.into(),
            },
        );
        id
    }

    /// Add user content.
    pub fn add_content(&mut self, item: impl Into<Drawable>) -> ElementId {
        self.add(Role::Content, item)
    }

    /// Add background decoration.
    pub fn add_background(&mut self, item: impl Into<Drawable>) -> ElementId {
        self.add(Role::Background, item)
    }

    /// Remove an element.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.z_order.retain(|&element_id| element_id != id);
        self.elements.remove(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// Elements in z-order (back to front).
    pub fn elements_ordered(&self) -> impl Iterator<Item = &Element> {
        self.z_order.iter().filter_map(|id| self.elements.get(id))
    }

    /// User content in z-order, skipping background decoration.
    pub fn content(&self) -> impl Iterator<Item = &Element> {
        self.elements_ordered().filter(|e| e.is_content())
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Bounding box of all content.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.content()
            .map(|e| e.item.bounds())
            .reduce(|acc, b| acc.union(b))
    }

    /// Queue a change notification.
    pub(crate) fn emit(&mut self, event: ContentEvent) {
        log::debug!("Page {} content changed: {:?}", self.id, event);
        self.events.push(event);
    }

    /// Drain pending change notifications.
    pub fn poll_events(&mut self) -> Vec<ContentEvent> {
        std::mem::take(&mut self.events)
    }
}
