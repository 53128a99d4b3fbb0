//! Typed argument records, one per tool.
//!
//! The argument bag is deserialized into one of these before any engine call;
//! malformed input becomes a validation error envelope. Unknown keys are
//! ignored, matching the tolerant wire contract.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use driver::{BrowserKind, Cookie, WaitUntil};

use crate::response::{error_response, ToolResponse};

/// Parse an argument bag into a typed record, or produce the validation
/// error envelope directly.
pub fn parse_args<T: DeserializeOwned>(args: serde_json::Value) -> Result<T, ToolResponse> {
    serde_json::from_value(args).map_err(|e| error_response(format!("Invalid arguments: {e}")))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateArgs {
    pub url: String,
    pub timeout: Option<u64>,
    pub wait_until: Option<WaitUntil>,
    /// Read by the dispatcher when provisioning the session.
    pub browser_type: Option<BrowserKind>,
    pub cookie: Option<Cookie>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotArgs {
    pub name: String,
    #[serde(default)]
    pub full_page: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClickArgs {
    pub selector: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FillArgs {
    pub selector: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectArgs {
    pub selector: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoverArgs {
    pub selector: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateArgs {
    pub script: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpRequestArgs {
    pub url: String,
    /// Request body for the verbs that carry one.
    pub value: Option<String>,
}
