//! Tool-Dispatch Core
//!
//! Remotely-invokable tools that drive a browser automation engine and an
//! HTTP request engine through a uniform dispatch protocol. This crate owns
//! the browser session lifecycle, the tool-dispatch state machine, and the
//! success/error envelope every tool returns; the wire transport that
//! delivers tool-call requests is an external concern behind the `Notifier`
//! seam.

pub mod args;
pub mod config;
pub mod error;
pub mod handler;
pub mod response;
pub mod session;
pub mod tool;
pub mod tools;

#[cfg(test)]
mod testutil;

pub use config::ToolDefaults;
pub use error::ToolError;
pub use handler::{ConsoleLogStore, ToolHandler};
pub use response::{error_response, success_response, ToolContent, ToolResponse};
pub use session::{Session, SessionManager};
pub use tool::{safe_execute, Notifier, NullNotifier, Tool, ToolContext};
