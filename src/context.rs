//! Rendering capability the scanner reads from.
//!
//! A [`RenderContext`] stands in for the live document and window: it answers
//! selector queries in document order and reports geometry, attributes and text
//! for the handles it hands out. The scanner never touches a browser directly.

use serde::{Deserialize, Serialize};

/// Elements that are potentially interactive. Fixed, not configurable.
pub const CANDIDATE_SELECTOR: &str =
    r#"a, button, input, select, textarea, [role="button"], [tabindex="0"]"#;

/// Bounding rectangle in viewport-relative CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Opaque reference to an element, only meaningful to the context that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(usize);

impl ElementHandle {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn id(&self) -> usize {
        self.0
    }
}

/// Read-only view of a rendered document and its viewport.
///
/// Implementations must return query results in document order. Lookups on a
/// handle the context does not know should fall back to empty values (an empty
/// string, no attributes, a zero-size rect) rather than panic: a zero-size rect
/// is never considered visible, so stale handles simply drop out of a scan.
pub trait RenderContext {
    /// Elements matching a CSS selector list, in document order.
    fn query_elements(&self, selector: &str) -> Vec<ElementHandle>;

    /// Bounding rectangle in viewport coordinates.
    fn bounding_rect(&self, el: ElementHandle) -> Rect;

    /// Viewport `(width, height)` in CSS pixels.
    fn viewport_size(&self) -> (f64, f64);

    fn location_url(&self) -> String;

    fn document_title(&self) -> String;

    /// Tag name as the document reports it (case not normalized).
    fn tag_name(&self, el: ElementHandle) -> String;

    /// Every attribute on the element as `(name, value)` pairs.
    fn attribute_list(&self, el: ElementHandle) -> Vec<(String, String)>;

    /// Single attribute lookup. HTML attribute names are case-insensitive.
    fn attribute(&self, el: ElementHandle, name: &str) -> Option<String> {
        self.attribute_list(el)
            .into_iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Full text content, untrimmed.
    fn text_content(&self, el: ElementHandle) -> String;

    /// Current form value (`el.value`), if the element has one.
    fn value(&self, el: ElementHandle) -> Option<String>;
}
