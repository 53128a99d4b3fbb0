//! Tool dispatcher.
//!
//! Resolves a tool name to its instance (built once, reused), provisions the
//! session for browser tools, and owns the console-log and screenshot side
//! channels. Every failure leaves this layer as an error envelope - nothing
//! propagates as a raw error across the tool-call boundary.

use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use driver::{BrowserKind, BrowserLauncher, CdpLauncher, ConsoleSink, LaunchConfig};

use crate::config::ToolDefaults;
use crate::response::{error_response, ToolResponse};
use crate::session::SessionManager;
use crate::tool::{Notifier, Tool, ToolContext};
use crate::tools::{
    ClickTool, CloseTool, EvaluateTool, FillTool, HoverTool, HttpRequestTool, NavigateTool,
    ScreenshotTool, SelectTool,
};

/// Browser tools that need a session provisioned before execution. The close
/// tool is deliberately absent: it works on whatever session currently
/// exists and must not launch a browser just to close it.
const BROWSER_TOOLS: &[&str] = &[
    "playwright_navigate",
    "playwright_screenshot",
    "playwright_click",
    "playwright_fill",
    "playwright_select",
    "playwright_hover",
    "playwright_evaluate",
];

/// Process-wide console log store. Pages push into it from the CDP reader
/// task through `sink()`; it is independent of session lifecycle and is
/// never cleared by a reset or close.
#[derive(Clone, Default)]
pub struct ConsoleLogStore {
    inner: Arc<Mutex<Vec<String>>>,
}

impl ConsoleLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: String) {
        self.inner.lock().unwrap().push(line);
    }

    pub fn entries(&self) -> Vec<String> {
        self.inner.lock().unwrap().clone()
    }

    /// Sink handed to the launcher so every launched page feeds this store.
    pub fn sink(&self) -> ConsoleSink {
        let store = self.clone();
        Arc::new(move |line| store.push(line))
    }
}

pub struct ToolHandler {
    sessions: Arc<SessionManager>,
    tools: HashMap<&'static str, Arc<dyn Tool>>,
    console_logs: ConsoleLogStore,
    screenshots: Arc<DashMap<String, Vec<u8>>>,
}

impl ToolHandler {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, console_logs: ConsoleLogStore) -> Self {
        let sessions = Arc::new(SessionManager::new(launcher));
        let screenshots: Arc<DashMap<String, Vec<u8>>> = Arc::new(DashMap::new());
        let defaults = ToolDefaults::default();

        let instances: Vec<Arc<dyn Tool>> = vec![
            Arc::new(NavigateTool::new(sessions.clone(), defaults)),
            Arc::new(CloseTool::new(sessions.clone())),
            Arc::new(ScreenshotTool::new(screenshots.clone())),
            Arc::new(ClickTool),
            Arc::new(FillTool),
            Arc::new(SelectTool),
            Arc::new(HoverTool),
            Arc::new(EvaluateTool),
            Arc::new(HttpRequestTool::get()),
            Arc::new(HttpRequestTool::post()),
            Arc::new(HttpRequestTool::put()),
            Arc::new(HttpRequestTool::patch()),
            Arc::new(HttpRequestTool::delete()),
        ];

        let tools = instances
            .into_iter()
            .map(|tool| (tool.name(), tool))
            .collect();

        Self {
            sessions,
            tools,
            console_logs,
            screenshots,
        }
    }

    /// Handler wired to real CDP endpoints, console capture included.
    pub fn connect_cdp(config: LaunchConfig) -> Self {
        let console_logs = ConsoleLogStore::new();
        let launcher = CdpLauncher::new(config).with_console_sink(console_logs.sink());
        Self::new(Arc::new(launcher), console_logs)
    }

    /// Dispatch one tool call. Always returns an envelope.
    pub async fn handle_tool_call(
        &self,
        name: &str,
        args: Value,
        notifier: Arc<dyn Notifier>,
    ) -> ToolResponse {
        let Some(tool) = self.tools.get(name) else {
            return error_response(format!("Unknown tool: {name}"));
        };

        let mut ctx = ToolContext {
            browser: None,
            page: None,
            notifier,
        };

        if name == "playwright_close" {
            if let Some((browser, page)) = self.sessions.current_handles().await {
                ctx.browser = Some(browser);
                ctx.page = Some(page);
            }
        } else if BROWSER_TOOLS.contains(&name) {
            let kind = match requested_kind(&args) {
                Ok(kind) => kind,
                Err(envelope) => return envelope,
            };
            match self.sessions.ensure_session(kind).await {
                Ok((browser, page)) => {
                    ctx.browser = Some(browser);
                    ctx.page = Some(page);
                }
                Err(e) => {
                    return error_response(format!("Failed to start {kind} browser: {e}"))
                }
            }
        }

        tracing::debug!("[ToolHandler] dispatching {name}");
        tool.execute(args, &ctx).await
    }

    /// Console lines captured so far, oldest first.
    pub fn console_logs(&self) -> Vec<String> {
        self.console_logs.entries()
    }

    /// Screenshot bytes by caller-supplied name.
    pub fn screenshot(&self, name: &str) -> Option<Vec<u8>> {
        self.screenshots.get(name).map(|entry| entry.clone())
    }

    pub fn screenshot_names(&self) -> Vec<String> {
        self.screenshots
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }
}

/// Browser kind requested in the argument bag, defaulting when absent.
fn requested_kind(args: &Value) -> Result<BrowserKind, ToolResponse> {
    match args.get("browserType") {
        None | Some(Value::Null) => Ok(BrowserKind::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|_| error_response(format!("Invalid browserType: {value}"))),
    }
}
