//! Live capture: reads the candidate elements out of a browser page.

use eoka::Page;
use tracing::debug;

use crate::captured::CapturedPage;
use crate::context::CANDIDATE_SELECTOR;
use crate::model::PageSnapshot;
use crate::scanner::ElementScanner;
use crate::{Error, Result};

/// JavaScript that dumps every element matching `__viewscan_selector`, in
/// document order, together with viewport size, URL and title. No filtering
/// happens in the page; visibility is decided by the scanner.
const CAPTURE_JS: &str = r#"
(() => {
    const nodes = [];
    for (const el of document.querySelectorAll(__viewscan_selector)) {
        const r = el.getBoundingClientRect();
        const attributes = [];
        for (const a of el.attributes) attributes.push([a.name, a.value]);
        nodes.push({
            tag: el.tagName,
            attributes,
            text: el.textContent || '',
            value: typeof el.value === 'string' ? el.value : null,
            rect: { x: r.left, y: r.top, width: r.width, height: r.height },
        });
    }
    return JSON.stringify({
        url: window.location.href,
        title: document.title,
        viewport_width: window.innerWidth,
        viewport_height: window.innerHeight,
        nodes,
    });
})()
"#;

/// Read the page's candidate elements into an in-memory context.
pub async fn capture(page: &Page) -> Result<CapturedPage> {
    let selector = serde_json::to_string(CANDIDATE_SELECTOR)
        .map_err(|e| Error::Capture(format!("selector encode error: {}", e)))?;
    let js = format!("var __viewscan_selector = {}; {}", selector, CAPTURE_JS);
    let json_str: String = page.evaluate(&js).await?;

    let captured: CapturedPage = serde_json::from_str(&json_str)
        .map_err(|e| Error::Capture(format!("capture parse error: {}", e)))?;
    debug!(
        "captured {} candidates from {}",
        captured.nodes.len(),
        captured.url
    );
    Ok(captured)
}

/// Capture the page and scan it.
pub async fn observe(page: &Page) -> Result<PageSnapshot> {
    let captured = capture(page).await?;
    Ok(ElementScanner::scan(&captured))
}
