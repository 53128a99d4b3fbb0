//! CDP wire types.
//!
//! Only the generic message shapes live here; domain payloads stay as
//! `serde_json::Value` until a caller needs a concrete struct.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Monotonically increasing request id.
pub type RequestId = u64;

/// Target id assigned by the browser.
pub type TargetId = String;

/// Session id for an attached target.
pub type SessionId = String;

/// Outgoing command.
#[derive(Debug, Clone, Serialize)]
pub struct CdpRequest {
    pub id: RequestId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

/// Reply to a command, matched back by id.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpResponse {
    pub id: RequestId,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<CdpProtocolError>,
}

/// Error payload inside a response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CdpProtocolError {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Unsolicited event (no request id).
#[derive(Debug, Clone, Deserialize)]
pub struct CdpEvent {
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<SessionId>,
}

/// Anything the browser can send us. Responses carry an id, events do not,
/// which is what the untagged deserialization keys on.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CdpMessage {
    Response(CdpResponse),
    Event(CdpEvent),
}

/// Result of `Target.attachToTarget`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachToTargetResult {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
}
