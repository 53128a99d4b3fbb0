//! Trait seams and transfer types shared with the tool layer.
//!
//! The tool layer owns sessions in terms of these traits only. The concrete
//! CDP handles implement them; tests implement them with mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Engine variant a session is bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        };
        f.write_str(name)
    }
}

/// Navigation lifecycle point to wait for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    #[default]
    Load,
    DomContentLoaded,
    NetworkIdle,
    Commit,
}

/// Options forwarded to the engine's navigate primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    pub timeout_ms: u64,
    pub wait_until: WaitUntil,
}

/// Cookie transfer object. Lives only as input/output of cookie injection;
/// the browser context's own jar is the source of truth. An empty `domain`
/// means the caller never supplied one - the navigation tool rejects that
/// before any engine call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Owning context of a page; the cookie-injection collaborator.
#[async_trait]
pub trait BrowserContext: Send + Sync {
    async fn add_cookies(&self, cookies: Vec<Cookie>) -> Result<()>;
}

/// A single page within a browser.
#[async_trait]
pub trait Page: Send + Sync {
    fn is_closed(&self) -> bool;

    /// The context owning this page.
    fn context(&self) -> Arc<dyn BrowserContext>;

    async fn goto(&self, url: &str, options: &NavigateOptions) -> Result<()>;

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>>;

    async fn click(&self, selector: &str) -> Result<()>;

    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    async fn select_option(&self, selector: &str, value: &str) -> Result<()>;

    async fn hover(&self, selector: &str) -> Result<()>;

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;
}

/// A running browser instance.
#[async_trait]
pub trait Browser: Send + Sync {
    fn is_connected(&self) -> bool;

    async fn close(&self) -> Result<()>;

    fn contexts(&self) -> Vec<Arc<dyn BrowserContext>>;
}

/// A freshly launched browser with its initial page.
pub struct LaunchedSession {
    pub browser: Arc<dyn Browser>,
    pub page: Arc<dyn Page>,
}

/// Creates browser instances per kind. The session manager calls this
/// whenever it needs a fresh browser; tests inject a mock.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, kind: BrowserKind) -> Result<LaunchedSession>;
}

/// Sink for console messages emitted by pages. Called from the CDP reader
/// task, so it must not block.
pub type ConsoleSink = Arc<dyn Fn(String) + Send + Sync>;
