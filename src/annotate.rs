//! Screenshot annotation: outlines each descriptor and tags it with its highlight index.

use eoka::{Page, Result};

use crate::model::PageSnapshot;

const OVERLAY_ID: &str = "__viewscan_overlay";

/// Draw the overlay, take a PNG, remove the overlay.
///
/// Coordinates come from the snapshot, so the page should not have scrolled
/// since it was taken.
pub async fn annotated_screenshot(page: &Page, snapshot: &PageSnapshot) -> Result<Vec<u8>> {
    if snapshot.is_empty() {
        return page.screenshot().await;
    }

    let marks: Vec<serde_json::Value> = snapshot
        .interactive_elements
        .iter()
        .map(|el| {
            serde_json::json!({
                "i": el.highlight_index,
                "x": el.coordinates.x,
                "y": el.coordinates.y,
                "w": el.coordinates.width,
                "h": el.coordinates.height,
            })
        })
        .collect();

    let inject_js = format!(
        r#"
(() => {{
    const marks = {marks};
    const root = document.createElement('div');
    root.id = '{id}';
    root.style.cssText = 'position:fixed;left:0;top:0;width:0;height:0;z-index:2147483647;pointer-events:none';

    for (const m of marks) {{
        const box = document.createElement('div');
        box.style.cssText = 'position:fixed;box-sizing:border-box;border:2px solid rgba(234,88,12,0.85)'
            + ';left:' + m.x + 'px;top:' + m.y + 'px;width:' + m.w + 'px;height:' + m.h + 'px';
        root.appendChild(box);

        const tag = document.createElement('div');
        const top = m.y >= 14 ? m.y - 14 : m.y;
        tag.style.cssText = 'position:fixed;background:rgba(234,88,12,0.95);color:#fff'
            + ';font:bold 10px/12px monospace;padding:1px 3px;white-space:nowrap'
            + ';left:' + Math.max(0, m.x) + 'px;top:' + Math.max(0, top) + 'px';
        tag.textContent = String(m.i);
        root.appendChild(tag);
    }}

    document.documentElement.appendChild(root);
}})()
"#,
        marks = serde_json::to_string(&marks).unwrap_or_else(|_| "[]".into()),
        id = OVERLAY_ID,
    );

    page.execute(&inject_js).await?;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let shot = page.screenshot().await;
    // Remove the overlay even when the screenshot failed
    page.execute(&format!("document.getElementById('{}')?.remove()", OVERLAY_ID))
        .await?;

    shot
}
