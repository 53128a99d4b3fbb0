//! Mock collaborators for the tool-layer tests.
//!
//! These stand in for the automation engine behind the `Browser`/`Page`/
//! `BrowserContext` seams and record every call so tests can assert which
//! primitives were (or were not) reached.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use driver::{
    Browser, BrowserContext, BrowserKind, BrowserLauncher, Cookie, DriverError, LaunchedSession,
    NavigateOptions, Page,
};

use crate::tool::{Notifier, NullNotifier, ToolContext};

#[derive(Default)]
pub struct MockContext {
    cookies: Mutex<Vec<Cookie>>,
    fail_message: Mutex<Option<String>>,
}

impl MockContext {
    pub fn fail_with(&self, message: &str) {
        *self.fail_message.lock().unwrap() = Some(message.to_string());
    }

    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookies.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserContext for MockContext {
    async fn add_cookies(&self, cookies: Vec<Cookie>) -> Result<(), DriverError> {
        if let Some(message) = self.fail_message.lock().unwrap().clone() {
            return Err(DriverError::Protocol { code: -1, message });
        }
        self.cookies.lock().unwrap().extend(cookies);
        Ok(())
    }
}

pub struct MockPage {
    closed: AtomicBool,
    context: Arc<MockContext>,
    goto_calls: Mutex<Vec<(String, NavigateOptions)>>,
    goto_error: Mutex<Option<DriverError>>,
    ops: Mutex<Vec<String>>,
}

impl MockPage {
    pub fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
            context: Arc::new(MockContext::default()),
            goto_calls: Mutex::new(Vec::new()),
            goto_error: Mutex::new(None),
            ops: Mutex::new(Vec::new()),
        }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Fail the next goto with `error`.
    pub fn fail_goto(&self, error: DriverError) {
        *self.goto_error.lock().unwrap() = Some(error);
    }

    pub fn goto_calls(&self) -> Vec<(String, NavigateOptions)> {
        self.goto_calls.lock().unwrap().clone()
    }

    pub fn mock_context(&self) -> Arc<MockContext> {
        self.context.clone()
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }
}

#[async_trait]
impl Page for MockPage {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn context(&self) -> Arc<dyn BrowserContext> {
        self.context.clone()
    }

    async fn goto(&self, url: &str, options: &NavigateOptions) -> Result<(), DriverError> {
        self.goto_calls
            .lock()
            .unwrap()
            .push((url.to_string(), *options));
        if let Some(error) = self.goto_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(())
    }

    async fn screenshot(&self, _full_page: bool) -> Result<Vec<u8>, DriverError> {
        self.ops.lock().unwrap().push("screenshot".to_string());
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        self.ops.lock().unwrap().push(format!("click {selector}"));
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), DriverError> {
        self.ops
            .lock()
            .unwrap()
            .push(format!("fill {selector}={value}"));
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<(), DriverError> {
        self.ops
            .lock()
            .unwrap()
            .push(format!("select {selector}={value}"));
        Ok(())
    }

    async fn hover(&self, selector: &str) -> Result<(), DriverError> {
        self.ops.lock().unwrap().push(format!("hover {selector}"));
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value, DriverError> {
        self.ops.lock().unwrap().push(format!("evaluate {script}"));
        Ok(Value::String("test result".to_string()))
    }
}

pub struct MockBrowser {
    connected: AtomicBool,
    close_count: AtomicUsize,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            close_count: AtomicUsize::new(0),
        }
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for MockBrowser {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn contexts(&self) -> Vec<Arc<dyn BrowserContext>> {
        Vec::new()
    }
}

/// Launcher producing fresh mock browser/page pairs, with optional failure.
pub struct MockLauncher {
    fail: bool,
    launches: Mutex<Vec<BrowserKind>>,
    browsers: Mutex<Vec<Arc<MockBrowser>>>,
    pages: Mutex<Vec<Arc<MockPage>>>,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self {
            fail: false,
            launches: Mutex::new(Vec::new()),
            browsers: Mutex::new(Vec::new()),
            pages: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn launch_count(&self) -> usize {
        self.launches.lock().unwrap().len()
    }

    pub fn launched_kinds(&self) -> Vec<BrowserKind> {
        self.launches.lock().unwrap().clone()
    }

    pub fn last_browser(&self) -> Option<Arc<MockBrowser>> {
        self.browsers.lock().unwrap().last().cloned()
    }

    pub fn last_page(&self) -> Option<Arc<MockPage>> {
        self.pages.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl BrowserLauncher for MockLauncher {
    async fn launch(&self, kind: BrowserKind) -> Result<LaunchedSession, DriverError> {
        self.launches.lock().unwrap().push(kind);
        if self.fail {
            return Err(DriverError::Launch("mock launch failure".to_string()));
        }
        let browser = Arc::new(MockBrowser::new());
        let page = Arc::new(MockPage::new());
        self.browsers.lock().unwrap().push(browser.clone());
        self.pages.lock().unwrap().push(page.clone());
        Ok(LaunchedSession {
            browser: browser as Arc<dyn Browser>,
            page: page as Arc<dyn Page>,
        })
    }
}

/// Notifier recording every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Context with a connected mock browser and the given page.
pub fn test_context(page: Option<Arc<MockPage>>) -> ToolContext {
    ToolContext {
        browser: Some(Arc::new(MockBrowser::new())),
        page: page.map(|p| p as Arc<dyn Page>),
        notifier: Arc::new(NullNotifier),
    }
}
