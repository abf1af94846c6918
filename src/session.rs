//! Browser session that owns its browser and page and snapshots on demand.

use eoka::{Browser, Page};
use tracing::{debug, info, warn};

use crate::config::{BrowserConfig, SettleConfig};
use crate::model::PageSnapshot;
use crate::{annotate, observe, Result};

/// A browser session. Each snapshot is taken fresh; only the latest one is
/// kept so screenshots can be labelled with its highlight indices.
pub struct Session {
    browser: Browser,
    page: Page,
    settle: SettleConfig,
    last: Option<PageSnapshot>,
}

impl Session {
    /// Launch a browser and open a blank page.
    pub async fn launch(config: &BrowserConfig, settle: SettleConfig) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless: config.headless,
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            viewport_width: config.viewport.width,
            viewport_height: config.viewport.height,
            ..Default::default()
        };

        debug!(
            "Launching browser (headless: {}, viewport: {}x{})",
            config.headless, config.viewport.width, config.viewport.height
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            settle,
            last: None,
        })
    }

    /// Get reference to underlying page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate, let the page settle, then snapshot.
    pub async fn goto(&mut self, url: &str) -> Result<&PageSnapshot> {
        info!("Navigating to: {}", url);
        self.last = None;
        self.page.goto(url).await?;
        self.settle_after_navigation().await;
        self.snapshot().await
    }

    /// Wait for dynamic content, then snapshot again without reloading.
    pub async fn refresh(&mut self) -> Result<&PageSnapshot> {
        self.page.wait(self.settle.refresh_ms).await;
        self.snapshot().await
    }

    /// Snapshot the page as it is right now.
    pub async fn snapshot(&mut self) -> Result<&PageSnapshot> {
        let snapshot = observe::observe(&self.page).await?;
        debug!("snapshot: {} elements on {}", snapshot.len(), snapshot.url);
        Ok(&*self.last.insert(snapshot))
    }

    /// Latest snapshot, if one was taken since the last navigation.
    pub fn last(&self) -> Option<&PageSnapshot> {
        self.last.as_ref()
    }

    /// Annotated PNG of the latest snapshot. Takes one first if needed.
    pub async fn screenshot(&mut self) -> Result<Vec<u8>> {
        if self.last.is_none() {
            self.snapshot().await?;
        }
        let empty = PageSnapshot::default();
        let snapshot = self.last.as_ref().unwrap_or(&empty);
        Ok(annotate::annotated_screenshot(&self.page, snapshot).await?)
    }

    /// Get the current URL.
    pub async fn url(&self) -> Result<String> {
        Ok(self.page.url().await?)
    }

    /// Get the page title.
    pub async fn title(&self) -> Result<String> {
        Ok(self.page.title().await?)
    }

    /// Close the browser.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }

    async fn settle_after_navigation(&self) {
        // Best-effort: some sites never stop polling
        if let Err(e) = self
            .page
            .wait_for_network_idle(self.settle.network_idle_ms, self.settle.navigate_ms)
            .await
        {
            warn!("network did not idle within {}ms: {}", self.settle.navigate_ms, e);
        }
    }
}
