use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use viewscan::{Config, PageSnapshot, Session};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NavigateRequest {
    #[schemars(description = "URL to navigate to")]
    pub url: String,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

fn err(e: impl std::fmt::Display) -> ErrorData {
    ErrorData::internal_error(e.to_string(), None::<Value>)
}

fn no_page() -> ErrorData {
    ErrorData::internal_error("No page open. Use navigate first.", None::<Value>)
}

fn text_ok(s: impl Into<String>) -> Result<CallToolResult, ErrorData> {
    Ok(CallToolResult::success(vec![Content::text(s.into())]))
}

/// Text listing returned by navigate/refresh.
fn listing(snapshot: &PageSnapshot) -> String {
    let mut out = format!("URL: {}\nTitle: {}\n", snapshot.url, snapshot.title);
    if snapshot.is_empty() {
        out.push_str("No interactive elements in viewport.");
    } else {
        out.push_str(&format!("Elements ({}):\n", snapshot.len()));
        out.push_str(&snapshot.element_list());
    }
    out
}

#[derive(Clone)]
pub struct ViewscanServer {
    session: Arc<Mutex<Option<Session>>>,
    config: Arc<Config>,
    tool_router: ToolRouter<Self>,
}

impl ViewscanServer {
    /// Lock the session, launching the browser on first use.
    async fn launched(&self) -> Result<MutexGuard<'_, Option<Session>>, ErrorData> {
        let mut guard = self.session.lock().await;
        if guard.is_none() {
            let session = Session::launch(&self.config.browser, self.config.settle)
                .await
                .map_err(err)?;
            *guard = Some(session);
        }
        Ok(guard)
    }
}

#[tool_router]
impl ViewscanServer {
    pub fn new(config: Config) -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Navigate to a URL, wait for it to settle, and list the interactive elements visible in the viewport. Launches browser on first call."
    )]
    async fn navigate(
        &self,
        req: Parameters<NavigateRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let mut guard = self.launched().await?;
        let session = guard.as_mut().ok_or_else(no_page)?;
        let snapshot = session.goto(&req.0.url).await.map_err(err)?;
        text_ok(listing(snapshot))
    }

    #[tool(
        description = "Return the visible interactive elements as JSON: url, title, interactiveElements[] with highlightIndex, tagName, type, text, attributes, coordinates."
    )]
    async fn snapshot(&self) -> Result<CallToolResult, ErrorData> {
        let mut guard = self.launched().await?;
        let session = guard.as_mut().ok_or_else(no_page)?;
        let snapshot = session.snapshot().await.map_err(err)?;
        let json = serde_json::to_string_pretty(snapshot).map_err(err)?;
        text_ok(json)
    }

    #[tool(
        description = "Wait briefly for dynamic content, then list the visible interactive elements again without reloading."
    )]
    async fn refresh(&self) -> Result<CallToolResult, ErrorData> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or_else(no_page)?;
        let snapshot = session.refresh().await.map_err(err)?;
        text_ok(listing(snapshot))
    }

    #[tool(
        description = "Take a screenshot with each visible interactive element outlined and labelled by its highlight index. Returns base64 PNG image."
    )]
    async fn screenshot(&self) -> Result<CallToolResult, ErrorData> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or_else(no_page)?;
        let png = session.screenshot().await.map_err(err)?;
        let count = session.last().map(|s| s.len()).unwrap_or(0);
        let b64 = BASE64.encode(&png);
        Ok(CallToolResult::success(vec![
            Content::image(b64, "image/png"),
            Content::text(format!("{} interactive elements in viewport.", count)),
        ]))
    }

    #[tool(description = "Get the current page URL and title.")]
    async fn page_info(&self) -> Result<CallToolResult, ErrorData> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or_else(no_page)?;
        let url = session.url().await.map_err(err)?;
        let title = session.title().await.map_err(err)?;
        text_ok(format!("URL: {}\nTitle: {}", url, title))
    }

    #[tool(description = "Close the browser and release resources.")]
    async fn close(&self) -> Result<CallToolResult, ErrorData> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.take() {
            session.close().await.map_err(err)?;
        }
        text_ok("Browser closed.")
    }
}

#[tool_handler]
impl ServerHandler for ViewscanServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "viewscan".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Page snapshot server. Use 'navigate' to open a URL (launches browser automatically) \
                 and get the interactive elements visible in the viewport, each as \
                 '[index] <tag ...> text (at x:.., y:..)'. 'snapshot' returns the same data as JSON, \
                 'refresh' re-reads the current page, 'screenshot' returns an image labelled with \
                 the same indices."
                    .into(),
            ),
        }
    }
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    use rmcp::ServiceExt;

    let server = ViewscanServer::new(config);
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}
