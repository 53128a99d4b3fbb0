//! Concrete browser handle and launcher.
//!
//! One `CdpBrowser` per WebSocket connection. The launcher resolves a
//! DevTools endpoint per browser kind from config; it does not spawn browser
//! processes itself.

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::cdp::protocol::TargetId;
use crate::cdp::CdpClient;
use crate::error::{DriverError, Result};
use crate::handles::{
    Browser, BrowserContext, BrowserKind, BrowserLauncher, ConsoleSink, LaunchedSession, Page,
};
use crate::page::{CdpBrowserContext, CdpPage};

/// DevTools endpoints per browser kind.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub chromium_url: String,
    pub firefox_url: String,
    pub webkit_url: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            chromium_url: "ws://localhost:9222/devtools/browser".to_string(),
            firefox_url: "ws://localhost:9223/devtools/browser".to_string(),
            webkit_url: "ws://localhost:9224/devtools/browser".to_string(),
        }
    }
}

impl LaunchConfig {
    pub fn endpoint(&self, kind: BrowserKind) -> &str {
        match kind {
            BrowserKind::Chromium => &self.chromium_url,
            BrowserKind::Firefox => &self.firefox_url,
            BrowserKind::Webkit => &self.webkit_url,
        }
    }
}

pub struct CdpBrowser {
    /// Instance id for log correlation across relaunches.
    pub id: Uuid,
    pub kind: BrowserKind,
    client: Arc<CdpClient>,
    context: Arc<CdpBrowserContext>,
    console_sink: Option<ConsoleSink>,
}

impl CdpBrowser {
    pub async fn connect(
        url: &str,
        kind: BrowserKind,
        console_sink: Option<ConsoleSink>,
    ) -> Result<Arc<Self>> {
        let client = CdpClient::connect(url).await?;
        let context = Arc::new(CdpBrowserContext::new(client.clone()));
        let id = Uuid::now_v7();
        tracing::info!("[CdpBrowser] connected {} instance {}", kind, id);

        Ok(Arc::new(Self {
            id,
            kind,
            client,
            context,
            console_sink,
        }))
    }

    /// Create a new page target and attach to it.
    pub async fn new_page(&self) -> Result<Arc<CdpPage>> {
        let result = self
            .client
            .send_request(
                "Target.createTarget",
                Some(json!({ "url": "about:blank" })),
                None,
            )
            .await?;

        let target_id: TargetId = result["targetId"]
            .as_str()
            .ok_or(DriverError::InvalidResponse(0))?
            .to_string();

        CdpPage::attach(
            self.client.clone(),
            target_id,
            self.context.clone(),
            self.console_sink.clone(),
        )
        .await
    }
}

#[async_trait::async_trait]
impl Browser for CdpBrowser {
    fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    async fn close(&self) -> Result<()> {
        // Ask the browser to shut down, then drop the socket either way.
        if let Err(e) = self.client.send_request("Browser.close", None, None).await {
            tracing::warn!("[CdpBrowser] Browser.close failed: {e}");
        }
        self.client.close().await
    }

    fn contexts(&self) -> Vec<Arc<dyn BrowserContext>> {
        vec![self.context.clone()]
    }
}

/// Launcher backed by per-kind DevTools endpoints.
pub struct CdpLauncher {
    config: LaunchConfig,
    console_sink: Option<ConsoleSink>,
}

impl CdpLauncher {
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            config,
            console_sink: None,
        }
    }

    /// Route console messages from every launched page into `sink`.
    pub fn with_console_sink(mut self, sink: ConsoleSink) -> Self {
        self.console_sink = Some(sink);
        self
    }
}

#[async_trait::async_trait]
impl BrowserLauncher for CdpLauncher {
    async fn launch(&self, kind: BrowserKind) -> Result<LaunchedSession> {
        let url = self.config.endpoint(kind);
        let browser = CdpBrowser::connect(url, kind, self.console_sink.clone())
            .await
            .map_err(|e| DriverError::Launch(format!("{kind} at {url}: {e}")))?;

        let page = match browser.new_page().await {
            Ok(page) => page,
            Err(e) => {
                // Never hand back a browser without a page.
                let _ = browser.close().await;
                return Err(DriverError::Launch(format!("{kind}: {e}")));
            }
        };

        Ok(LaunchedSession {
            browser: browser as Arc<dyn Browser>,
            page: page as Arc<dyn Page>,
        })
    }
}
