//! Concrete page and context handles over CDP.
//!
//! A page is a lightweight wrapper around the shared client plus its target's
//! session id. Lifecycle events (load, DOMContentLoaded, detach, crash) are
//! subscribed once at attach time; `goto` waits on a broadcast of those
//! events instead of installing a fresh subscription per navigation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::cdp::protocol::{AttachToTargetResult, SessionId, TargetId};
use crate::cdp::CdpClient;
use crate::error::{DriverError, Result};
use crate::handles::{
    BrowserContext, ConsoleSink, Cookie, NavigateOptions, Page, WaitUntil,
};

/// Page lifecycle points observed via CDP events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleEvent {
    DomContentLoaded,
    Load,
}

/// Cookie-injection collaborator backed by `Storage.setCookies`.
pub struct CdpBrowserContext {
    client: Arc<CdpClient>,
}

impl CdpBrowserContext {
    pub fn new(client: Arc<CdpClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl BrowserContext for CdpBrowserContext {
    async fn add_cookies(&self, cookies: Vec<Cookie>) -> Result<()> {
        self.client
            .send_request(
                "Storage.setCookies",
                Some(json!({ "cookies": cookies })),
                None,
            )
            .await?;
        Ok(())
    }
}

pub struct CdpPage {
    client: Arc<CdpClient>,
    pub target_id: TargetId,
    pub session_id: SessionId,
    context: Arc<CdpBrowserContext>,
    closed: Arc<AtomicBool>,
    lifecycle: broadcast::Sender<LifecycleEvent>,
}

impl CdpPage {
    /// Attach to a target: flat session, Page + Runtime domains enabled,
    /// lifecycle/crash/console subscriptions installed.
    pub async fn attach(
        client: Arc<CdpClient>,
        target_id: TargetId,
        context: Arc<CdpBrowserContext>,
        console_sink: Option<ConsoleSink>,
    ) -> Result<Arc<Self>> {
        let result = client
            .send_request(
                "Target.attachToTarget",
                Some(json!({ "targetId": target_id, "flatten": true })),
                None,
            )
            .await?;

        let attach: AttachToTargetResult =
            serde_json::from_value(result).map_err(DriverError::Json)?;
        let session_id = attach.session_id;

        for domain in ["Page", "Runtime"] {
            if let Err(e) = client
                .send_request(format!("{domain}.enable"), None, Some(session_id.clone()))
                .await
            {
                tracing::warn!("[CdpPage] {domain}.enable failed: {e}");
            }
        }

        let (lifecycle, _) = broadcast::channel(64);
        let closed = Arc::new(AtomicBool::new(false));

        let page = Arc::new(Self {
            client: client.clone(),
            target_id,
            session_id: session_id.clone(),
            context,
            closed: closed.clone(),
            lifecycle: lifecycle.clone(),
        });

        // Detach or crash marks the page closed; the handle itself stays
        // valid so preconditions can observe the state.
        for method in ["Target.detachedFromTarget", "Inspector.targetCrashed"] {
            let closed = closed.clone();
            let session = session_id.clone();
            client.subscribe(
                method,
                Arc::new(move |event| {
                    if event.session_id.as_deref() == Some(session.as_str())
                        || event.session_id.is_none()
                    {
                        closed.store(true, Ordering::SeqCst);
                    }
                }),
            );
        }

        {
            let tx = lifecycle.clone();
            let session = session_id.clone();
            client.subscribe(
                "Page.domContentEventFired",
                Arc::new(move |event| {
                    if event.session_id.as_deref() == Some(session.as_str()) {
                        let _ = tx.send(LifecycleEvent::DomContentLoaded);
                    }
                }),
            );
        }
        {
            let tx = lifecycle;
            let session = session_id.clone();
            client.subscribe(
                "Page.loadEventFired",
                Arc::new(move |event| {
                    if event.session_id.as_deref() == Some(session.as_str()) {
                        let _ = tx.send(LifecycleEvent::Load);
                    }
                }),
            );
        }

        if let Some(sink) = console_sink {
            let session = session_id;
            client.subscribe(
                "Runtime.consoleAPICalled",
                Arc::new(move |event| {
                    if event.session_id.as_deref() != Some(session.as_str()) {
                        return;
                    }
                    if let Some(params) = event.params.as_ref() {
                        sink(format_console_entry(params));
                    }
                }),
            );
        }

        Ok(page)
    }

    /// Evaluate an expression, surfacing page-side exceptions as errors.
    async fn eval_checked(&self, expression: String) -> Result<Value> {
        let result = self
            .client
            .send_request(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
                Some(self.session_id.clone()),
            )
            .await?;

        if let Some(details) = result.get("exceptionDetails") {
            let message = details["exception"]["description"]
                .as_str()
                .or_else(|| details["text"].as_str())
                .unwrap_or("script threw an exception")
                .to_string();
            return Err(DriverError::Protocol { code: -1, message });
        }

        Ok(result["result"]["value"].clone())
    }
}

/// Render a `Runtime.consoleAPICalled` payload as a single log line.
fn format_console_entry(params: &Value) -> String {
    let level = params["type"].as_str().unwrap_or("log");
    let parts: Vec<String> = params["args"]
        .as_array()
        .map(|args| {
            args.iter()
                .map(|arg| {
                    arg.get("value")
                        .map(|v| match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .or_else(|| arg["description"].as_str().map(String::from))
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default();
    format!("[{}] {}", level, parts.join(" "))
}

#[async_trait::async_trait]
impl Page for CdpPage {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || !self.client.is_connected()
    }

    fn context(&self) -> Arc<dyn BrowserContext> {
        self.context.clone()
    }

    async fn goto(&self, url: &str, options: &NavigateOptions) -> Result<()> {
        // Subscribe before navigating so a fast load cannot slip past us.
        let mut events = self.lifecycle.subscribe();

        let result = self
            .client
            .send_request(
                "Page.navigate",
                Some(json!({ "url": url })),
                Some(self.session_id.clone()),
            )
            .await?;

        if let Some(error_text) = result["errorText"].as_str() {
            if !error_text.is_empty() {
                return Err(DriverError::Protocol {
                    code: -1,
                    message: error_text.to_string(),
                });
            }
        }

        // NetworkIdle is approximated by the load event; CDP has no direct
        // equivalent without Network-domain bookkeeping.
        let wanted = match options.wait_until {
            WaitUntil::Commit => return Ok(()),
            WaitUntil::DomContentLoaded => LifecycleEvent::DomContentLoaded,
            WaitUntil::Load | WaitUntil::NetworkIdle => LifecycleEvent::Load,
        };

        let deadline = Duration::from_millis(options.timeout_ms);
        let wait = async {
            loop {
                match events.recv().await {
                    Ok(event) if event == wanted => return Ok(()),
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(DriverError::Closed)
                    }
                }
            }
        };

        match tokio::time::timeout(deadline, wait).await {
            Ok(result) => result,
            Err(_) => Err(DriverError::Timeout),
        }
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        let result = self
            .client
            .send_request(
                "Page.captureScreenshot",
                Some(json!({
                    "format": "png",
                    "captureBeyondViewport": full_page,
                })),
                Some(self.session_id.clone()),
            )
            .await?;

        let data = result["data"]
            .as_str()
            .ok_or(DriverError::InvalidResponse(0))?;
        Ok(BASE64.decode(data)?)
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let sel = serde_json::to_string(selector)?;
        self.eval_checked(format!(
            "(() => {{ const el = document.querySelector({sel}); \
             if (!el) throw new Error('No element found for selector: ' + {sel}); \
             el.click(); }})()"
        ))
        .await?;
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let sel = serde_json::to_string(selector)?;
        let val = serde_json::to_string(value)?;
        self.eval_checked(format!(
            "(() => {{ const el = document.querySelector({sel}); \
             if (!el) throw new Error('No element found for selector: ' + {sel}); \
             el.value = {val}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); }})()"
        ))
        .await?;
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        let sel = serde_json::to_string(selector)?;
        let val = serde_json::to_string(value)?;
        self.eval_checked(format!(
            "(() => {{ const el = document.querySelector({sel}); \
             if (!el) throw new Error('No element found for selector: ' + {sel}); \
             el.value = {val}; \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); }})()"
        ))
        .await?;
        Ok(())
    }

    async fn hover(&self, selector: &str) -> Result<()> {
        let sel = serde_json::to_string(selector)?;
        self.eval_checked(format!(
            "(() => {{ const el = document.querySelector({sel}); \
             if (!el) throw new Error('No element found for selector: ' + {sel}); \
             el.scrollIntoView(); \
             el.dispatchEvent(new MouseEvent('mouseover', {{ bubbles: true }})); }})()"
        ))
        .await?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        self.eval_checked(script.to_string()).await
    }
}
