//! Tool base contract: the capability trait, the per-call context, and the
//! safe-execute wrapper every browser tool runs under.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use driver::{Browser, DriverError, Page};

use crate::response::{error_response, ToolResponse};

/// Seam to the external notification channel (console messages, screenshot
/// announcements). The wire transport behind it is out of scope.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

/// Notifier that drops everything. Default for callers without a channel.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _message: &str) {}
}

/// Per-call view of the session, injected by the dispatcher. Tools read it;
/// only the session manager replaces it.
pub struct ToolContext {
    pub browser: Option<Arc<dyn Browser>>,
    pub page: Option<Arc<dyn Page>>,
    pub notifier: Arc<dyn Notifier>,
}

/// A named operation with a fixed argument shape and a uniform envelope.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, args: serde_json::Value, ctx: &ToolContext) -> ToolResponse;
}

/// Validate the page precondition, run `body`, and normalize failures.
///
/// A missing or closed page short-circuits without invoking `body`. A body
/// that returns an envelope (success or a tool-specific error) passes through
/// untouched; a body that fails with a driver error becomes the generic
/// "Operation failed" envelope.
pub async fn safe_execute<F, Fut>(ctx: &ToolContext, body: F) -> ToolResponse
where
    F: FnOnce(Arc<dyn Page>) -> Fut,
    Fut: Future<Output = Result<ToolResponse, DriverError>>,
{
    let page = match &ctx.page {
        Some(page) if !page.is_closed() => page.clone(),
        _ => {
            return error_response(
                "Page is not available or has been closed. Please retry.",
            )
        }
    };

    match body(page).await {
        Ok(response) => response,
        Err(e) => error_response(format!("Operation failed: {e}")),
    }
}
