//! # viewscan
//!
//! Snapshots of the interactive elements currently visible in a page's viewport,
//! shaped for agents that decide what to click next.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use viewscan::{BrowserConfig, Session, SettleConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> viewscan::Result<()> {
//! let mut session = Session::launch(&BrowserConfig::default(), SettleConfig::default()).await?;
//! let snapshot = session.goto("https://example.com").await?;
//!
//! // [1] <a> More information... (at x:120, y:310)
//! print!("{}", snapshot.element_list());
//!
//! session.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The scanner itself does not need a browser. Anything implementing
//! [`RenderContext`] can be scanned, including the in-memory [`CapturedPage`]:
//!
//! ```rust
//! use viewscan::{CapturedNode, CapturedPage, ElementScanner, Rect};
//!
//! let mut page = CapturedPage::new("https://example.com", "Example", 800.0, 600.0);
//! page.push(CapturedNode::new("BUTTON").text("Submit").rect(Rect::new(10.0, 10.0, 80.0, 24.0)));
//!
//! let snapshot = ElementScanner::scan(&page);
//! assert_eq!(snapshot.interactive_elements[0].text, "Submit");
//! ```

pub mod annotate;
pub mod captured;
pub mod config;
pub mod context;
pub mod model;
pub mod observe;
pub mod scanner;
pub mod session;

pub use captured::{CapturedNode, CapturedPage};
pub use config::{BrowserConfig, Config, SettleConfig, Viewport};
pub use context::{ElementHandle, Rect, RenderContext, CANDIDATE_SELECTOR};
pub use model::{Coordinates, ElementDescriptor, PageSnapshot, PageSummary};
pub use scanner::{is_in_viewport, ElementScanner};
pub use session::Session;

/// Result type for viewscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the browser-facing surfaces. Scanning itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("capture failed: {0}")]
    Capture(String),
}
