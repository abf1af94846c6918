//! Viewport scan: candidate selection, visibility filtering, normalization.
//!
//! "Visible" here means the element's layout box intersects the viewport and is
//! not collapsed. CSS `display`, `visibility`, opacity and occlusion are not
//! consulted, so a transparent element with a real box is reported. Callers
//! depend on this looser definition; do not tighten it here.

use std::collections::BTreeMap;

use tracing::debug;

use crate::context::{ElementHandle, Rect, RenderContext, CANDIDATE_SELECTOR};
use crate::model::{Coordinates, ElementDescriptor, PageSnapshot};

/// Scans a [`RenderContext`] into a [`PageSnapshot`].
///
/// Stateless: each call starts its highlight counter at 1 and builds a fresh
/// snapshot. Scanning never fails; a page without visible candidates yields an
/// empty element list with URL and title still filled in.
pub struct ElementScanner;

impl ElementScanner {
    pub fn scan<C: RenderContext + ?Sized>(ctx: &C) -> PageSnapshot {
        let (viewport_width, viewport_height) = ctx.viewport_size();
        let candidates = ctx.query_elements(CANDIDATE_SELECTOR);
        let candidate_count = candidates.len();

        let mut elements: Vec<ElementDescriptor> = Vec::new();
        let mut next_index: u32 = 1;
        for el in candidates {
            let rect = ctx.bounding_rect(el);
            if !is_in_viewport(&rect, viewport_width, viewport_height) {
                continue;
            }
            elements.push(describe(ctx, el, &rect, next_index));
            next_index += 1;
        }

        debug!(
            "scan: {} candidates, {} in viewport ({}x{})",
            candidate_count,
            elements.len(),
            viewport_width,
            viewport_height
        );

        PageSnapshot {
            url: ctx.location_url(),
            title: ctx.document_title(),
            interactive_elements: elements,
        }
    }
}

/// Non-empty box that overlaps the viewport. Touching an edge counts.
pub fn is_in_viewport(rect: &Rect, viewport_width: f64, viewport_height: f64) -> bool {
    rect.width > 0.0
        && rect.height > 0.0
        && rect.bottom() >= 0.0
        && rect.right() >= 0.0
        && rect.top() <= viewport_height
        && rect.left() <= viewport_width
}

fn describe<C: RenderContext + ?Sized>(
    ctx: &C,
    el: ElementHandle,
    rect: &Rect,
    highlight_index: u32,
) -> ElementDescriptor {
    let attributes: BTreeMap<String, String> = ctx.attribute_list(el).into_iter().collect();
    let tag_name = ctx.tag_name(el).to_lowercase();

    let input_value = if tag_name == "input" {
        ctx.value(el).filter(|v| !v.is_empty())
    } else {
        None
    };
    let text = input_value.unwrap_or_else(|| js_trim(&ctx.text_content(el)).to_string());

    let element_type = ctx
        .attribute(el, "role")
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| tag_name.clone());

    ElementDescriptor {
        highlight_index,
        tag_name,
        element_type,
        text,
        attributes,
        coordinates: Coordinates {
            x: round_half_up(rect.x),
            y: round_half_up(rect.y),
            width: round_half_up(rect.width),
            height: round_half_up(rect.height),
        },
        is_visible: true,
    }
}

/// Trim the characters `String.prototype.trim` strips: Unicode White_Space
/// except NEL (U+0085), plus BOM (U+FEFF).
fn js_trim(s: &str) -> &str {
    s.trim_matches(|c: char| c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}'))
}

/// Nearest integer, ties toward +infinity (so -2.5 becomes -2, 2.5 becomes 3).
fn round_half_up(v: f64) -> i64 {
    let r = v.round();
    let r = if v - r == 0.5 { r + 1.0 } else { r };
    r as i64
}
