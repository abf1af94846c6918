//! In-memory render context.
//!
//! [`CapturedPage`] holds the candidate nodes of a page in document order along
//! with everything the scanner asks about them. The capture script in
//! [`observe`](crate::observe) decodes into one, and tests build them by hand.
//!
//! Selection already happened when the nodes were collected (the browser ran
//! `querySelectorAll(CANDIDATE_SELECTOR)`), so queries return the stored nodes
//! as they are.

use serde::Deserialize;

use crate::context::{ElementHandle, Rect, RenderContext};

/// One element as read from the document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CapturedNode {
    /// Tag name as reported by the DOM (uppercase for HTML documents)
    pub tag: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub rect: Rect,
}

impl CapturedNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }
}

/// A page frozen at capture time.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CapturedPage {
    pub url: String,
    pub title: String,
    pub viewport_width: f64,
    pub viewport_height: f64,
    #[serde(default)]
    pub nodes: Vec<CapturedNode>,
}

impl CapturedPage {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            viewport_width,
            viewport_height,
            nodes: Vec::new(),
        }
    }

    /// Append a candidate node; order of pushes is document order.
    pub fn push(&mut self, node: CapturedNode) -> ElementHandle {
        self.nodes.push(node);
        ElementHandle::new(self.nodes.len() - 1)
    }

    pub fn with_node(mut self, node: CapturedNode) -> Self {
        self.nodes.push(node);
        self
    }

    fn node(&self, el: ElementHandle) -> Option<&CapturedNode> {
        self.nodes.get(el.id())
    }
}

impl RenderContext for CapturedPage {
    /// The stored nodes in capture order; they are the match set already.
    fn query_elements(&self, _selector: &str) -> Vec<ElementHandle> {
        (0..self.nodes.len()).map(ElementHandle::new).collect()
    }

    fn bounding_rect(&self, el: ElementHandle) -> Rect {
        self.node(el).map(|n| n.rect).unwrap_or_default()
    }

    fn viewport_size(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    fn location_url(&self) -> String {
        self.url.clone()
    }

    fn document_title(&self) -> String {
        self.title.clone()
    }

    fn tag_name(&self, el: ElementHandle) -> String {
        self.node(el).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn attribute_list(&self, el: ElementHandle) -> Vec<(String, String)> {
        self.node(el)
            .map(|n| n.attributes.clone())
            .unwrap_or_default()
    }

    fn text_content(&self, el: ElementHandle) -> String {
        self.node(el).map(|n| n.text.clone()).unwrap_or_default()
    }

    fn value(&self, el: ElementHandle) -> Option<String> {
        self.node(el).and_then(|n| n.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CANDIDATE_SELECTOR;

    fn sample() -> CapturedPage {
        CapturedPage::new("https://example.com/", "Example", 1024.0, 768.0)
            .with_node(CapturedNode::new("BUTTON").text("Go"))
            .with_node(CapturedNode::new("A").attr("href", "/").text("Home"))
            .with_node(CapturedNode::new("SPAN").attr("tabindex", "0"))
            .with_node(CapturedNode::new("INPUT").attr("type", "text").value("x"))
    }

    #[test]
    fn test_query_returns_stored_order() {
        let page = sample();
        let ids: Vec<usize> = page
            .query_elements(CANDIDATE_SELECTOR)
            .into_iter()
            .map(|h| h.id())
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_fixture_selects_candidates_in_document_order() {
        let page = fixture::html_page(
            r#"
            <div>wrapper
                <p><a href="/">Home</a></p>
                <div role="button">Menu</div>
                <div role="link">Not a candidate</div>
                <span tabindex="-1">Nope</span>
            </div>
            <input type="text" value="x">
            <span tabindex="0">Focus</span>
            "#,
            Rect::new(0.0, 0.0, 10.0, 10.0),
        );
        let tags: Vec<&str> = page.nodes.iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["A", "DIV", "INPUT", "SPAN"]);
        assert_eq!(page.nodes[1].text, "Menu");
        assert_eq!(page.nodes[2].value.as_deref(), Some("x"));
        assert_eq!(page.nodes[3].attributes, vec![("tabindex".into(), "0".into())]);
    }

    #[test]
    fn test_lookups() {
        let page = sample();
        let link = ElementHandle::new(1);
        assert_eq!(page.tag_name(link), "A");
        assert_eq!(page.attribute(link, "HREF").as_deref(), Some("/"));
        assert_eq!(page.attribute(link, "role"), None);
        assert_eq!(page.text_content(link), "Home");
        assert_eq!(page.value(ElementHandle::new(3)).as_deref(), Some("x"));
        assert_eq!(page.viewport_size(), (1024.0, 768.0));
    }

    #[test]
    fn test_unknown_handle_falls_back_to_empty() {
        let page = sample();
        let stale = ElementHandle::new(99);
        assert_eq!(page.bounding_rect(stale), Rect::default());
        assert!(page.tag_name(stale).is_empty());
        assert!(page.attribute_list(stale).is_empty());
        assert!(page.value(stale).is_none());
    }

    #[test]
    fn test_deserialize_capture_payload() {
        let json = r#"{
            "url": "https://example.com/",
            "title": "Example",
            "viewport_width": 1080,
            "viewport_height": 1080,
            "nodes": [
                {
                    "tag": "BUTTON",
                    "attributes": [["id", "go"]],
                    "text": " Go ",
                    "value": "",
                    "rect": {"x": 8.5, "y": 10, "width": 40, "height": 20}
                }
            ]
        }"#;
        let page: CapturedPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.nodes.len(), 1);
        assert_eq!(page.nodes[0].attributes[0], ("id".into(), "go".into()));
        assert_eq!(page.nodes[0].rect.x, 8.5);
        assert_eq!(page.viewport_height, 1080.0);
    }
}
