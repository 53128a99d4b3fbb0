//! Browser Automation Driver
//!
//! Concrete CDP (Chrome DevTools Protocol) plumbing plus the trait seams the
//! tool layer programs against. The tool layer never touches the wire types
//! directly: it sees `Browser`, `Page` and `BrowserContext` handles, so tests
//! can substitute mocks and the engine can be swapped without touching the
//! dispatch logic.

pub mod browser;
pub mod cdp;
pub mod error;
pub mod handles;
pub mod page;

pub use browser::{CdpBrowser, CdpLauncher, LaunchConfig};
pub use cdp::CdpClient;
pub use error::DriverError;
pub use handles::{
    Browser, BrowserContext, BrowserKind, BrowserLauncher, ConsoleSink, Cookie, LaunchedSession,
    NavigateOptions, Page, SameSite, WaitUntil,
};
pub use page::CdpPage;
