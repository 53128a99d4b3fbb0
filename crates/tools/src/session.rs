//! Session state - the single source of truth for "is there a usable
//! browser/page right now".
//!
//! One live session per process. The manager is constructed once and threaded
//! through the dispatcher and tools explicitly; there is no module-level
//! singleton.

use std::sync::Arc;
use tokio::sync::RwLock;

use driver::{Browser, BrowserKind, BrowserLauncher, DriverError, Page};

/// Current browser+page pair and the kind it was launched for.
pub struct Session {
    pub browser: Arc<dyn Browser>,
    pub page: Arc<dyn Page>,
    pub kind: BrowserKind,
}

pub struct SessionManager {
    launcher: Arc<dyn BrowserLauncher>,
    slot: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            slot: RwLock::new(None),
        }
    }

    /// Return a live (browser, page) pair for `kind`, reusing the current
    /// session when it matches and is still connected. A kind switch or a
    /// dead browser tears the old session down (close errors are swallowed)
    /// and launches fresh. A launch failure leaves the slot empty.
    pub async fn ensure_session(
        &self,
        kind: BrowserKind,
    ) -> Result<(Arc<dyn Browser>, Arc<dyn Page>), DriverError> {
        let mut slot = self.slot.write().await;

        if let Some(session) = slot.as_ref() {
            if session.kind == kind && session.browser.is_connected() {
                return Ok((session.browser.clone(), session.page.clone()));
            }
        }

        if let Some(old) = slot.take() {
            if old.browser.is_connected() {
                tracing::info!(
                    "[SessionManager] replacing {} session with {}",
                    old.kind,
                    kind
                );
                if let Err(e) = old.browser.close().await {
                    tracing::warn!("[SessionManager] error closing previous browser: {e}");
                }
            } else {
                tracing::warn!("[SessionManager] previous {} browser already dead", old.kind);
            }
        }

        // Slot is already empty here, so a failed launch cannot leave a
        // half-initialized session behind.
        let launched = self.launcher.launch(kind).await?;
        let browser = launched.browser.clone();
        let page = launched.page.clone();
        *slot = Some(Session {
            browser: launched.browser,
            page: launched.page,
            kind,
        });

        tracing::info!("[SessionManager] started {} session", kind);
        Ok((browser, page))
    }

    /// Clear the slot without attempting to close anything. Used after a
    /// detected disconnect, where close would itself fail or hang.
    pub async fn reset(&self) {
        let had = self.slot.write().await.take();
        if let Some(session) = had {
            tracing::warn!(
                "[SessionManager] reset: dropping {} session without close",
                session.kind
            );
        }
    }

    /// Clear the slot after an orderly teardown (the close tool has already
    /// dealt with the handles).
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }

    /// Handles of the current session, if any. Does not provision.
    pub async fn current_handles(&self) -> Option<(Arc<dyn Browser>, Arc<dyn Page>)> {
        self.slot
            .read()
            .await
            .as_ref()
            .map(|s| (s.browser.clone(), s.page.clone()))
    }

    pub async fn current_kind(&self) -> Option<BrowserKind> {
        self.slot.read().await.as_ref().map(|s| s.kind)
    }
}
