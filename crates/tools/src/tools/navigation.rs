//! Navigation and close tools.
//!
//! Navigation is the one operation guaranteed to run after the browser may
//! have silently died, so it is the single place that distinguishes
//! "recoverable - reset and retry" from "ordinary failure - report and keep
//! the session".

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use driver::NavigateOptions;

use crate::args::{parse_args, NavigateArgs};
use crate::config::ToolDefaults;
use crate::response::{error_response, success_response, ToolResponse};
use crate::session::SessionManager;
use crate::tool::{safe_execute, Tool, ToolContext};

pub struct NavigateTool {
    sessions: Arc<SessionManager>,
    defaults: ToolDefaults,
}

impl NavigateTool {
    pub fn new(sessions: Arc<SessionManager>, defaults: ToolDefaults) -> Self {
        Self { sessions, defaults }
    }
}

#[async_trait]
impl Tool for NavigateTool {
    fn name(&self) -> &'static str {
        "playwright_navigate"
    }

    async fn execute(&self, args: serde_json::Value, ctx: &ToolContext) -> ToolResponse {
        let args: NavigateArgs = match parse_args(args) {
            Ok(args) => args,
            Err(envelope) => return envelope,
        };

        if Url::parse(&args.url).is_err() {
            return error_response(format!("Invalid URL: {}", args.url));
        }

        // A dead browser means the whole session is stale; reset so the next
        // call starts clean.
        match &ctx.browser {
            Some(browser) if browser.is_connected() => {}
            _ => {
                self.sessions.reset().await;
                return error_response(
                    "Browser is not connected. The connection has been reset - \
                     please retry your navigation.",
                );
            }
        }

        // A closed page does not condemn the browser; no reset here.
        match &ctx.page {
            Some(page) if !page.is_closed() => {}
            _ => {
                return error_response(
                    "Page is not available or has been closed. Please retry your navigation.",
                )
            }
        }

        let sessions = self.sessions.clone();
        let defaults = self.defaults.clone();

        safe_execute(ctx, |page| async move {
            if let Some(mut cookie) = args.cookie {
                if cookie.domain.is_empty() {
                    return Ok(error_response(
                        "Cookie domain is required. Please provide a domain for the cookie.",
                    ));
                }
                if cookie.path.is_none() {
                    cookie.path = Some(defaults.cookie_path.to_string());
                }
                if let Err(e) = page.context().add_cookies(vec![cookie]).await {
                    // Cookie failure is terminal for this call; skip navigation.
                    return Ok(error_response(format!("Failed to set cookie: {e}")));
                }
            }

            let options = NavigateOptions {
                timeout_ms: args.timeout.unwrap_or(defaults.navigation_timeout_ms),
                wait_until: args.wait_until.unwrap_or(defaults.wait_until),
            };

            match page.goto(&args.url, &options).await {
                Ok(()) => Ok(success_response(format!("Navigated to {}", args.url))),
                Err(e) if e.is_disconnect() => {
                    sessions.reset().await;
                    Ok(error_response(format!(
                        "Browser connection issue: {e}. Connection has been reset - \
                         please retry your navigation."
                    )))
                }
                Err(e) => Err(e),
            }
        })
        .await
    }
}

/// Idempotent teardown. Close is best-effort cleanup and never a user-facing
/// failure.
pub struct CloseTool {
    sessions: Arc<SessionManager>,
}

impl CloseTool {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl Tool for CloseTool {
    fn name(&self) -> &'static str {
        "playwright_close"
    }

    async fn execute(&self, _args: serde_json::Value, ctx: &ToolContext) -> ToolResponse {
        let Some(browser) = &ctx.browser else {
            return success_response("No browser instance to close");
        };

        if browser.is_connected() {
            if let Err(e) = browser.close().await {
                tracing::error!("[CloseTool] error while closing browser: {e}");
            }
        } else {
            tracing::info!("[CloseTool] browser already disconnected, cleaning up state");
        }

        self.sessions.clear().await;
        success_response("Browser closed successfully")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_context, MockBrowser, MockLauncher, MockPage};
    use crate::tool::NullNotifier;
    use driver::{BrowserKind, DriverError, WaitUntil};
    use serde_json::json;

    fn navigate_tool() -> (NavigateTool, Arc<SessionManager>) {
        let sessions = Arc::new(SessionManager::new(Arc::new(MockLauncher::new())));
        (
            NavigateTool::new(sessions.clone(), ToolDefaults::default()),
            sessions,
        )
    }

    #[tokio::test]
    async fn navigates_with_defaults() {
        let (tool, _) = navigate_tool();
        let page = Arc::new(MockPage::new());
        let ctx = test_context(Some(page.clone()));

        let response = tool
            .execute(json!({ "url": "https://example.com" }), &ctx)
            .await;

        assert!(!response.is_error);
        assert!(response.text().contains("Navigated to https://example.com"));
        let calls = page.goto_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://example.com");
        assert_eq!(calls[0].1.timeout_ms, 30_000);
        assert_eq!(calls[0].1.wait_until, WaitUntil::Load);
    }

    #[tokio::test]
    async fn wait_until_and_timeout_pass_through() {
        let (tool, _) = navigate_tool();
        let page = Arc::new(MockPage::new());
        let ctx = test_context(Some(page.clone()));

        tool.execute(
            json!({ "url": "https://example.com", "waitUntil": "networkidle", "timeout": 5000 }),
            &ctx,
        )
        .await;

        let calls = page.goto_calls();
        assert_eq!(calls[0].1.wait_until, WaitUntil::NetworkIdle);
        assert_eq!(calls[0].1.timeout_ms, 5000);
    }

    #[tokio::test]
    async fn disconnected_browser_resets_without_navigating() {
        let launcher = Arc::new(MockLauncher::new());
        let sessions = Arc::new(SessionManager::new(launcher.clone()));
        sessions.ensure_session(BrowserKind::Chromium).await.unwrap();
        let tool = NavigateTool::new(sessions.clone(), ToolDefaults::default());

        let browser = Arc::new(MockBrowser::new());
        browser.disconnect();
        let page = Arc::new(MockPage::new());
        let ctx = ToolContext {
            browser: Some(browser),
            page: Some(page.clone()),
            notifier: Arc::new(NullNotifier),
        };

        let response = tool
            .execute(json!({ "url": "https://example.com" }), &ctx)
            .await;

        assert!(response.is_error);
        assert!(response.text().contains("not connected"));
        assert!(page.goto_calls().is_empty());
        // The stale session was dropped.
        assert_eq!(sessions.current_kind().await, None);
    }

    #[tokio::test]
    async fn missing_page_reports_without_reset() {
        let launcher = Arc::new(MockLauncher::new());
        let sessions = Arc::new(SessionManager::new(launcher.clone()));
        sessions.ensure_session(BrowserKind::Chromium).await.unwrap();
        let tool = NavigateTool::new(sessions.clone(), ToolDefaults::default());

        let ctx = ToolContext {
            browser: Some(Arc::new(MockBrowser::new())),
            page: None,
            notifier: Arc::new(NullNotifier),
        };

        let response = tool
            .execute(json!({ "url": "https://example.com" }), &ctx)
            .await;

        assert!(response.is_error);
        assert!(response.text().contains("Page is not available"));
        // Browser may still be fine; session stays.
        assert_eq!(sessions.current_kind().await, Some(BrowserKind::Chromium));
    }

    #[tokio::test]
    async fn closed_page_reports_closed() {
        let (tool, _) = navigate_tool();
        let page = Arc::new(MockPage::new());
        page.close();
        let ctx = test_context(Some(page.clone()));

        let response = tool
            .execute(json!({ "url": "https://example.com" }), &ctx)
            .await;

        assert!(response.is_error);
        assert!(response.text().contains("closed"));
        assert!(page.goto_calls().is_empty());
    }

    #[tokio::test]
    async fn cookie_without_domain_is_rejected_before_any_engine_call() {
        let (tool, _) = navigate_tool();
        let page = Arc::new(MockPage::new());
        let ctx = test_context(Some(page.clone()));

        let response = tool
            .execute(
                json!({
                    "url": "https://example.com",
                    "cookie": { "name": "invalid_cookie", "value": "test_value" },
                }),
                &ctx,
            )
            .await;

        assert!(response.is_error);
        assert!(response.text().contains("Cookie domain is required"));
        assert!(page.mock_context().cookies().is_empty());
        assert!(page.goto_calls().is_empty());
    }

    #[tokio::test]
    async fn cookie_path_defaults_to_root() {
        let (tool, _) = navigate_tool();
        let page = Arc::new(MockPage::new());
        let ctx = test_context(Some(page.clone()));

        tool.execute(
            json!({
                "url": "https://example.com",
                "cookie": { "name": "basic", "value": "v", "domain": "example.com" },
            }),
            &ctx,
        )
        .await;

        let cookies = page.mock_context().cookies();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].path.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn explicit_cookie_path_is_kept_and_navigation_follows() {
        let (tool, _) = navigate_tool();
        let page = Arc::new(MockPage::new());
        let ctx = test_context(Some(page.clone()));

        let response = tool
            .execute(
                json!({
                    "url": "https://example.com",
                    "cookie": {
                        "name": "s",
                        "value": "v",
                        "domain": "example.com",
                        "path": "/dash",
                    },
                }),
                &ctx,
            )
            .await;

        assert!(!response.is_error);
        let cookies = page.mock_context().cookies();
        assert_eq!(cookies[0].path.as_deref(), Some("/dash"));
        let calls = page.goto_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.timeout_ms, 30_000);
        assert_eq!(calls[0].1.wait_until, WaitUntil::Load);
    }

    #[tokio::test]
    async fn cookie_failure_is_terminal_for_the_call() {
        let (tool, _) = navigate_tool();
        let page = Arc::new(MockPage::new());
        page.mock_context().fail_with("Invalid cookie domain");
        let ctx = test_context(Some(page.clone()));

        let response = tool
            .execute(
                json!({
                    "url": "https://example.com",
                    "cookie": { "name": "s", "value": "v", "domain": "example.com" },
                }),
                &ctx,
            )
            .await;

        assert!(response.is_error);
        assert!(response.text().contains("Failed to set cookie"));
        assert!(response.text().contains("Invalid cookie domain"));
        assert!(page.goto_calls().is_empty());
    }

    #[tokio::test]
    async fn ordinary_navigation_failure_keeps_the_session() {
        let launcher = Arc::new(MockLauncher::new());
        let sessions = Arc::new(SessionManager::new(launcher.clone()));
        sessions.ensure_session(BrowserKind::Chromium).await.unwrap();
        let tool = NavigateTool::new(sessions.clone(), ToolDefaults::default());

        let page = Arc::new(MockPage::new());
        page.fail_goto(DriverError::Protocol {
            code: -1,
            message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
        });
        let ctx = test_context(Some(page));

        let response = tool
            .execute(json!({ "url": "https://example.com" }), &ctx)
            .await;

        assert!(response.is_error);
        assert!(response.text().contains("Operation failed"));
        assert_eq!(sessions.current_kind().await, Some(BrowserKind::Chromium));
    }

    #[tokio::test]
    async fn disconnect_during_navigation_resets_the_session() {
        let launcher = Arc::new(MockLauncher::new());
        let sessions = Arc::new(SessionManager::new(launcher.clone()));
        sessions.ensure_session(BrowserKind::Chromium).await.unwrap();
        let tool = NavigateTool::new(sessions.clone(), ToolDefaults::default());

        let page = Arc::new(MockPage::new());
        page.fail_goto(DriverError::TargetClosed);
        let ctx = test_context(Some(page));

        let response = tool
            .execute(json!({ "url": "https://example.com" }), &ctx)
            .await;

        assert!(response.is_error);
        assert!(response.text().contains("Browser connection issue"));
        assert!(response.text().contains("retry"));
        assert_eq!(sessions.current_kind().await, None);

        // The next ensure_session starts a fresh browser.
        sessions.ensure_session(BrowserKind::Chromium).await.unwrap();
        assert_eq!(launcher.launch_count(), 2);
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let (tool, _) = navigate_tool();
        let page = Arc::new(MockPage::new());
        let ctx = test_context(Some(page.clone()));

        let response = tool.execute(json!({ "url": "not a url" }), &ctx).await;

        assert!(response.is_error);
        assert!(response.text().contains("Invalid URL"));
        assert!(page.goto_calls().is_empty());
    }

    #[tokio::test]
    async fn close_without_browser_succeeds_trivially() {
        let sessions = Arc::new(SessionManager::new(Arc::new(MockLauncher::new())));
        let tool = CloseTool::new(sessions);
        let ctx = ToolContext {
            browser: None,
            page: None,
            notifier: Arc::new(NullNotifier),
        };

        let response = tool.execute(json!({}), &ctx).await;
        assert!(!response.is_error);
        assert!(response.text().contains("No browser instance to close"));
    }

    #[tokio::test]
    async fn close_tears_down_and_clears() {
        let launcher = Arc::new(MockLauncher::new());
        let sessions = Arc::new(SessionManager::new(launcher.clone()));
        sessions.ensure_session(BrowserKind::Chromium).await.unwrap();
        let tool = CloseTool::new(sessions.clone());

        let browser = launcher.last_browser().unwrap();
        let ctx = ToolContext {
            browser: Some(browser.clone()),
            page: None,
            notifier: Arc::new(NullNotifier),
        };

        let response = tool.execute(json!({}), &ctx).await;
        assert!(!response.is_error);
        assert_eq!(browser.close_count(), 1);
        assert_eq!(sessions.current_kind().await, None);
    }

    #[tokio::test]
    async fn close_skips_close_call_on_dead_browser() {
        let sessions = Arc::new(SessionManager::new(Arc::new(MockLauncher::new())));
        let tool = CloseTool::new(sessions);

        let browser = Arc::new(MockBrowser::new());
        browser.disconnect();
        let ctx = ToolContext {
            browser: Some(browser.clone()),
            page: None,
            notifier: Arc::new(NullNotifier),
        };

        let response = tool.execute(json!({}), &ctx).await;
        assert!(!response.is_error);
        assert_eq!(browser.close_count(), 0);
    }
}
