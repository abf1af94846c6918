//! Snapshot records handed to callers.
//!
//! Field names on the wire are camelCase (`highlightIndex`, `tagName`,
//! `interactiveElements`, ...) so downstream consumers see the same shape
//! whether the snapshot came from a browser or a test context.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rounded viewport position and size of an element.
///
/// `i64` so far-scrolled offsets survive; values past ±2^63 saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// One visible interactive element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    /// 1-based position among the visible elements of this snapshot
    pub highlight_index: u32,
    /// Lowercase tag name
    pub tag_name: String,
    /// `role` attribute when present and non-empty, otherwise the tag name
    #[serde(rename = "type")]
    pub element_type: String,
    /// Trimmed text content, or the current value of a non-empty `<input>`
    pub text: String,
    /// The element's own attributes, verbatim
    pub attributes: BTreeMap<String, String>,
    pub coordinates: Coordinates,
    /// Always true; invisible elements are never emitted
    pub is_visible: bool,
}

impl fmt::Display for ElementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] <{}", self.highlight_index, self.tag_name)?;
        if self.element_type != self.tag_name {
            write!(f, " role='{}'", self.element_type)?;
        }
        for attr in ["id", "name", "class"] {
            if let Some(v) = self.attributes.get(attr) {
                write!(f, " {}='{}'", attr, v)?;
            }
        }
        write!(
            f,
            "> {} (at x:{}, y:{})",
            self.text, self.coordinates.x, self.coordinates.y
        )
    }
}

/// Everything visible and interactive on the page at scan time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    pub interactive_elements: Vec<ElementDescriptor>,
}

impl PageSnapshot {
    /// Look up a descriptor by its 1-based highlight index.
    pub fn get(&self, highlight_index: u32) -> Option<&ElementDescriptor> {
        let pos = usize::try_from(highlight_index.checked_sub(1)?).ok()?;
        self.interactive_elements.get(pos)
    }

    pub fn len(&self) -> usize {
        self.interactive_elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactive_elements.is_empty()
    }

    /// Compact text list for LLM consumption, one line per element.
    /// Each line: `[index] <tag role='x' id='y'> text (at x:.., y:..)`
    pub fn element_list(&self) -> String {
        let mut out = String::with_capacity(self.interactive_elements.len() * 48);
        for el in &self.interactive_elements {
            out.push_str(&el.to_string());
            out.push('\n');
        }
        out
    }

    /// Flattened view with pre-rendered element lines.
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            url: self.url.clone(),
            title: self.title.clone(),
            elements: self
                .interactive_elements
                .iter()
                .map(|e| e.to_string())
                .collect(),
            element_count: self.interactive_elements.len(),
        }
    }
}

/// Text-oriented page summary: URL, title and one rendered line per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub url: String,
    pub title: String,
    pub elements: Vec<String>,
    pub element_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_descriptor(
        index: u32,
        tag: &str,
        element_type: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> ElementDescriptor {
        ElementDescriptor {
            highlight_index: index,
            tag_name: tag.to_string(),
            element_type: element_type.to_string(),
            text: text.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            coordinates: Coordinates {
                x: 12,
                y: 40,
                width: 80,
                height: 24,
            },
            is_visible: true,
        }
    }

    #[test]
    fn test_display_basic() {
        let el = make_descriptor(1, "button", "button", "Submit", &[]);
        assert_eq!(el.to_string(), "[1] <button> Submit (at x:12, y:40)");
    }

    #[test]
    fn test_display_role_differs_from_tag() {
        let el = make_descriptor(3, "div", "button", "Click", &[("role", "button")]);
        assert_eq!(el.to_string(), "[3] <div role='button'> Click (at x:12, y:40)");
    }

    #[test]
    fn test_display_selected_attributes_in_order() {
        let el = make_descriptor(
            2,
            "input",
            "input",
            "hello",
            &[
                ("class", "field wide"),
                ("type", "text"),
                ("name", "q"),
                ("id", "search"),
            ],
        );
        assert_eq!(
            el.to_string(),
            "[2] <input id='search' name='q' class='field wide'> hello (at x:12, y:40)"
        );
    }

    #[test]
    fn test_serialize_wire_names() {
        let el = make_descriptor(1, "a", "a", "Home", &[("href", "/")]);
        let snapshot = PageSnapshot {
            url: "https://example.com/".into(),
            title: "Example".into(),
            interactive_elements: vec![el],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["url"], "https://example.com/");
        let first = &json["interactiveElements"][0];
        assert_eq!(first["highlightIndex"], 1);
        assert_eq!(first["tagName"], "a");
        assert_eq!(first["type"], "a");
        assert_eq!(first["isVisible"], true);
        assert_eq!(first["attributes"]["href"], "/");
        assert_eq!(first["coordinates"]["width"], 80);
    }

    #[test]
    fn test_get_by_highlight_index() {
        let snapshot = PageSnapshot {
            url: String::new(),
            title: String::new(),
            interactive_elements: vec![
                make_descriptor(1, "a", "a", "One", &[]),
                make_descriptor(2, "button", "button", "Two", &[]),
            ],
        };
        assert!(snapshot.get(0).is_none());
        assert_eq!(snapshot.get(1).unwrap().text, "One");
        assert_eq!(snapshot.get(2).unwrap().text, "Two");
        assert!(snapshot.get(3).is_none());
    }

    #[test]
    fn test_element_list_and_summary() {
        let snapshot = PageSnapshot {
            url: "about:blank".into(),
            title: "t".into(),
            interactive_elements: vec![
                make_descriptor(1, "a", "a", "One", &[]),
                make_descriptor(2, "button", "button", "Two", &[]),
            ],
        };
        assert_eq!(
            snapshot.element_list(),
            "[1] <a> One (at x:12, y:40)\n[2] <button> Two (at x:12, y:40)\n"
        );

        let summary = snapshot.summary();
        assert_eq!(summary.element_count, 2);
        assert_eq!(summary.elements[1], "[2] <button> Two (at x:12, y:40)");
        assert_eq!(summary.url, "about:blank");
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = PageSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.element_list(), "");
        assert_eq!(snapshot.summary().element_count, 0);
    }
}
