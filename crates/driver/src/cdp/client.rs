//! CDP client - single WebSocket per browser connection.
//!
//! Requests are matched to responses by id through a pending map; events fan
//! out to subscribers by method name. When the socket drops, the reader task
//! flips the liveness flag and fails every in-flight request, so callers see
//! `DriverError::Closed` instead of hanging.

use dashmap::DashMap;
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::protocol::*;
use crate::error::{DriverError, Result};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Event subscriber callback.
pub type EventCallback = Arc<dyn Fn(CdpEvent) + Send + Sync>;

pub struct CdpClient {
    /// Monotonic request id counter.
    next_id: AtomicU64,

    /// In-flight requests awaiting a response, keyed by request id.
    pending: Arc<DashMap<RequestId, oneshot::Sender<CdpResponse>>>,

    /// Event subscribers, keyed by method name (e.g. "Page.loadEventFired").
    subscribers: Arc<DashMap<String, Vec<EventCallback>>>,

    /// WebSocket write half.
    ws_sink: Arc<RwLock<WsSink>>,

    /// False once the reader task observes the socket closing.
    connected: Arc<AtomicBool>,
}

impl CdpClient {
    /// Connect to a DevTools endpoint and spawn the reader task.
    pub async fn connect(ws_url: &str) -> Result<Arc<Self>> {
        let (ws_stream, _) = connect_async(ws_url).await?;
        let (sink, mut stream) = ws_stream.split();

        let client = Arc::new(Self {
            next_id: AtomicU64::new(1),
            pending: Arc::new(DashMap::new()),
            subscribers: Arc::new(DashMap::new()),
            ws_sink: Arc::new(RwLock::new(sink)),
            connected: Arc::new(AtomicBool::new(true)),
        });

        let reader = client.clone();
        tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if let Err(e) = reader.handle_message(&text) {
                            tracing::error!("[CdpClient] failed to handle message: {}", e);
                        }
                    }
                    Ok(Message::Close(_)) => {
                        tracing::info!("[CdpClient] WebSocket closed by peer");
                        break;
                    }
                    Err(e) => {
                        tracing::error!("[CdpClient] WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }

            reader.connected.store(false, Ordering::SeqCst);
            // Dropping the senders wakes every waiter with a recv error,
            // which send_request maps to DriverError::Closed.
            reader.pending.clear();
        });

        Ok(client)
    }

    /// Whether the underlying socket is still up.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Send a command and wait for its response.
    pub async fn send_request(
        &self,
        method: impl Into<String>,
        params: Option<Value>,
        session_id: Option<SessionId>,
    ) -> Result<Value> {
        if !self.is_connected() {
            return Err(DriverError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.into(),
            params,
            session_id,
        };

        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);

        let json = serde_json::to_string(&request)?;
        {
            let mut sink = self.ws_sink.write().await;
            if let Err(e) = sink.send(Message::Text(json)).await {
                self.pending.remove(&id);
                return Err(DriverError::WebSocket(e));
            }
        }

        let response = rx.await.map_err(|_| DriverError::Closed)?;

        if let Some(error) = response.error {
            return Err(DriverError::Protocol {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }

    /// Subscribe to events by method name. Subscriptions live as long as the
    /// client; there is no unsubscribe.
    pub fn subscribe(&self, method: impl Into<String>, callback: EventCallback) {
        self.subscribers
            .entry(method.into())
            .or_default()
            .push(callback);
    }

    fn handle_message(&self, text: &str) -> Result<()> {
        let msg: CdpMessage = serde_json::from_str(text)?;

        match msg {
            CdpMessage::Response(response) => {
                if let Some((_, tx)) = self.pending.remove(&response.id) {
                    let _ = tx.send(response); // Receiver may have given up.
                } else {
                    tracing::warn!(
                        "[CdpClient] response for unknown request: {}",
                        response.id
                    );
                }
            }
            CdpMessage::Event(event) => {
                if let Some(subscribers) = self.subscribers.get(&event.method) {
                    for callback in subscribers.value() {
                        callback(event.clone());
                    }
                }
            }
        }

        Ok(())
    }

    /// Close the connection. Further requests fail with `Closed`.
    pub async fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        let mut sink = self.ws_sink.write().await;
        sink.close().await?;
        Ok(())
    }
}
