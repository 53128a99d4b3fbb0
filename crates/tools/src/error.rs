//! Tool-layer error type.
//!
//! Internal plumbing only: every variant is recovered into an error envelope
//! before it reaches the tool-call boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    Driver(#[from] driver::DriverError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}
