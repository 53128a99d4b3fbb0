//! Driver error type and disconnect classification.
//!
//! Disconnects are primarily a typed concern (`Closed`, `TargetClosed`,
//! `NotConnected`, transport failures). Raw protocol errors carry only a
//! message string, so those fall back to substring matching against the known
//! disconnect phrasings. The fallback is best-effort and only applies to
//! errors the engine cannot type.

use thiserror::Error;

use crate::cdp::protocol::RequestId;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CDP protocol error: {code} - {message}")]
    Protocol { code: i32, message: String },

    #[error("Navigation timed out")]
    Timeout,

    #[error("Connection closed")]
    Closed,

    #[error("Target page, context or browser has been closed")]
    TargetClosed,

    #[error("Browser is not connected")]
    NotConnected,

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Invalid response for request {0}")]
    InvalidResponse(RequestId),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Known disconnect phrasings for untyped protocol errors.
const DISCONNECT_PATTERNS: &[&str] = &[
    "Target page, context or browser has been closed",
    "Target closed",
    "Session closed",
    "Browser has been disconnected",
    "Connection closed",
];

impl DriverError {
    /// True when the error means the browser process or connection is gone
    /// and the session must be recreated before the next attempt.
    pub fn is_disconnect(&self) -> bool {
        match self {
            DriverError::Closed
            | DriverError::TargetClosed
            | DriverError::NotConnected
            | DriverError::WebSocket(_) => true,
            DriverError::Protocol { message, .. } => {
                DISCONNECT_PATTERNS.iter().any(|p| message.contains(p))
            }
            _ => false,
        }
    }
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
