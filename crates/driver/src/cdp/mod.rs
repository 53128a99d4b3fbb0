//! CDP communication layer: wire types and the WebSocket client.

pub mod client;
pub mod protocol;

pub use client::CdpClient;
pub use protocol::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};
