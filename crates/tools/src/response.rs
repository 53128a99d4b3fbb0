//! Uniform response envelope.
//!
//! Every tool returns this shape and nothing else crosses the tool-call
//! boundary. `is_error` is the single branching signal for callers; the text
//! is for humans and logs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub is_error: bool,
    pub content: Vec<ToolContent>,
}

impl ToolResponse {
    /// First text block, for callers that only want the message.
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text,
            None => "",
        }
    }
}

pub fn success_response(text: impl Into<String>) -> ToolResponse {
    ToolResponse {
        is_error: false,
        content: vec![ToolContent::Text { text: text.into() }],
    }
}

pub fn error_response(text: impl Into<String>) -> ToolResponse {
    ToolResponse {
        is_error: true,
        content: vec![ToolContent::Text { text: text.into() }],
    }
}
