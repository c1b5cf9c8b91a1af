//! Client coordinator and connection run loop.
//!
//! The [`Client`] owns the connection lifecycle:
//!
//! ```text
//! Idle → Connecting → Open → {Closed | Errored}
//! ```
//!
//! `Connecting` ensures a device record exists and resolves its websocket
//! endpoint; on open the authorization frame goes out immediately, and the
//! `Open` loop hands every inbound text frame to the router. Nothing here
//! reconnects: close and transport errors end [`Client::run`], and restart
//! policy belongs to the caller.
//!
//! Frames are processed one at a time in arrival order on the receive task;
//! REST lookups during routing are awaited inline, so a slow response delays
//! the next frame (backpressure is implicit and total).

// ============================================================================
// Imports
// ============================================================================

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::device::{DeviceRecord, DeviceRegistry};
use crate::error::{Error, Result};
use crate::protocol::AuthorizationFrame;
use crate::router::Router;

use super::builder::ClientBuilder;

// ============================================================================
// LifecycleState
// ============================================================================

/// Connection lifecycle state.
///
/// `Closed` and `Errored` are terminal for one run; a new call to
/// [`Client::run`] starts over from `Connecting` with the cached device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No connection attempted yet.
    Idle,
    /// Registering the device and opening the connection.
    Connecting,
    /// Authorized connection, receive loop running.
    Open,
    /// Connection closed by either side.
    Closed,
    /// Connection terminated by a transport or startup error.
    Errored,
}

// ============================================================================
// Client
// ============================================================================

/// Persistent websocket event client.
///
/// Construct via [`Client::builder()`], then call [`Client::run`], which
/// blocks its task for as long as the connection is open.
///
/// # Example
///
/// ```no_run
/// use webex_websocket_client::Client;
///
/// # async fn example() -> webex_websocket_client::Result<()> {
/// let mut client = Client::builder()
///     .access_token("token")
///     .on_message(|message, _activity| {
///         println!("message: {message}");
///     })
///     .build()?;
///
/// client.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    /// Device registration and discovery.
    registry: DeviceRegistry,

    /// Per-frame router.
    router: Router,

    /// Bearer access token for the authorization frame.
    access_token: String,

    /// Device record, cached after the first registration and immutable for
    /// the rest of the run.
    device_info: Option<DeviceRecord>,

    /// Current lifecycle state.
    state: LifecycleState,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state)
            .field("has_device", &self.device_info.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Client - Public API
// ============================================================================

impl Client {
    /// Creates a configuration builder for the client.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns the cached device record, if registered.
    #[inline]
    #[must_use]
    pub fn device(&self) -> Option<&DeviceRecord> {
        self.device_info.as_ref()
    }

    /// Opens the connection and runs the receive loop until it ends.
    ///
    /// Blocks the calling task for the lifetime of the connection. Returns
    /// `Ok(())` on a clean close; no automatic reconnect is performed.
    ///
    /// # Errors
    ///
    /// - [`Error::Registration`] / [`Error::MissingWebSocketUrl`] if no
    ///   usable device record can be obtained (fatal startup errors)
    /// - [`Error::WebSocket`] / [`Error::Connection`] on transport failure
    pub async fn run(&mut self) -> Result<()> {
        match self.run_connection().await {
            Ok(()) => {
                self.transition(LifecycleState::Closed);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, fatal = e.is_fatal(), "Connection terminated");
                self.transition(LifecycleState::Errored);
                Err(e)
            }
        }
    }
}

// ============================================================================
// Client - Internal API
// ============================================================================

impl Client {
    /// Creates a new client in the `Idle` state.
    pub(crate) fn new(registry: DeviceRegistry, router: Router, access_token: String) -> Self {
        Self {
            registry,
            router,
            access_token,
            device_info: None,
            state: LifecycleState::Idle,
        }
    }

    /// One full lifecycle pass: register, connect, authorize, receive.
    async fn run_connection(&mut self) -> Result<()> {
        self.transition(LifecycleState::Connecting);

        let device = self.ensure_device().await?;
        let ws_url = device.web_socket_url.ok_or(Error::MissingWebSocketUrl)?;

        info!(url = %ws_url, "Opening websocket connection");
        let (stream, _) = connect_async(ws_url.as_str()).await?;
        let (mut write, mut read) = stream.split();

        // On open: authorize immediately. No explicit auth ack exists at
        // this layer; the service simply starts accepting frames.
        let auth = AuthorizationFrame::new(&self.access_token);
        let json = serde_json::to_string(&auth)?;
        write.send(Message::Text(json.into())).await?;
        debug!(auth_id = %auth.id, "Authorization frame sent");

        self.transition(LifecycleState::Open);

        while let Some(inbound) = read.next().await {
            match inbound {
                Ok(Message::Text(text)) => {
                    // A failed notification aborts only itself; the next
                    // frame is unaffected.
                    if let Err(e) = self.router.route(text.as_str(), &mut write).await {
                        warn!(error = %e, "Failed to process notification");
                    }
                }

                Ok(Message::Close(close)) => {
                    let code: u16 = close.as_ref().map_or(1000, |frame| frame.code.into());
                    let reason = close
                        .as_ref()
                        .map(|frame| frame.reason.as_str().to_string())
                        .unwrap_or_default();
                    info!(code, reason, "Connection closed by remote");
                    break;
                }

                // Binary, Ping, Pong carry no notifications.
                Ok(_) => {}

                Err(e) => {
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Returns the cached device record, registering one if needed.
    async fn ensure_device(&mut self) -> Result<DeviceRecord> {
        if let Some(device) = &self.device_info {
            return Ok(device.clone());
        }

        let device = self.registry.get_or_create_device(true).await?;
        self.device_info = Some(device.clone());
        Ok(device)
    }

    /// Records a lifecycle transition.
    fn transition(&mut self, to: LifecycleState) {
        debug!(from = ?self.state, to = ?to, "Lifecycle transition");
        self.state = to;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{Map, Value, json};
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    use crate::api::EntityFetcher;
    use crate::identifiers::MessageId;
    use crate::testutil::spawn_http_stub;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("webex_websocket_client=trace")
            .with_test_writer()
            .try_init();
    }

    struct FakeFetcher {
        entity: Value,
    }

    #[async_trait]
    impl EntityFetcher for FakeFetcher {
        async fn fetch_message(&self, _id: &MessageId) -> crate::Result<Value> {
            Ok(self.entity.clone())
        }

        async fn fetch_attachment_action(&self, _id: &MessageId) -> crate::Result<Value> {
            Ok(self.entity.clone())
        }
    }

    fn cached_device(ws_url: Option<&str>) -> DeviceRecord {
        DeviceRecord {
            name: Some("rust-spark-client".to_string()),
            web_socket_url: ws_url.map(str::to_string),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_new_client_is_idle() {
        let client = Client::builder().access_token("t").build().expect("build");
        assert_eq!(client.state(), LifecycleState::Idle);
        assert!(client.device().is_none());
    }

    #[tokio::test]
    async fn test_missing_websocket_url_is_fatal() {
        let mut client = Client::builder().access_token("t").build().expect("build");
        client.device_info = Some(cached_device(None));

        let err = client.run().await.unwrap_err();
        assert!(matches!(err, Error::MissingWebSocketUrl));
        assert!(err.is_fatal());
        assert_eq!(client.state(), LifecycleState::Errored);
    }

    #[tokio::test]
    async fn test_registration_failure_aborts_startup() {
        // List fails (falls through, logged) and create fails too.
        let (base, _requests) = spawn_http_stub(vec![
            (500, r#"{"error":"unavailable"}"#.to_string()),
            (500, r#"{"error":"unavailable"}"#.to_string()),
        ])
        .await;

        let mut client = Client::builder()
            .access_token("t")
            .device_url(base)
            .build()
            .expect("build");

        assert!(client.run().await.is_err());
        assert_eq!(client.state(), LifecycleState::Errored);
    }

    #[tokio::test]
    async fn test_end_to_end_card_action_flow() {
        init_tracing();

        // Resolution endpoint the rewritten target URL points at.
        let (resolve_base, _requests) =
            spawn_http_stub(vec![(200, r#"{"id":"CANON"}"#.to_string())]).await;

        // In-process websocket service.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let notification = format!(
            r#"{{
                "data": {{
                    "eventType": "conversation.activity",
                    "activity": {{
                        "id": "XYZ",
                        "verb": "cardAction",
                        "target": {{ "url": "{resolve_base}/conversations/ABC", "id": "ABC" }}
                    }}
                }}
            }}"#
        );

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(socket).await.expect("handshake");

            let auth = match ws.next().await.expect("auth frame").expect("auth ok") {
                Message::Text(text) => text.as_str().to_string(),
                other => panic!("expected auth text frame, got {other:?}"),
            };

            ws.send(Message::Text(notification.into()))
                .await
                .expect("send notification");

            let ack = loop {
                match ws.next().await.expect("ack frame").expect("ack ok") {
                    Message::Text(text) => break text.as_str().to_string(),
                    _ => continue,
                }
            };

            ws.close(None).await.expect("close");
            (auth, ack)
        });

        let dispatched: Arc<Mutex<Vec<(Value, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&dispatched);

        let mut client = Client::builder()
            .access_token("tok-42")
            .entity_fetcher(Arc::new(FakeFetcher {
                entity: json!({ "id": "CANON", "inputs": { "vote": "yes" } }),
            }))
            .on_card_action(move |entity, activity| {
                sink.lock()
                    .expect("dispatch lock")
                    .push((entity, activity.id.to_string()));
            })
            .build()
            .expect("build");
        client.device_info = Some(cached_device(Some(&format!("ws://{addr}"))));

        client.run().await.expect("run");
        assert_eq!(client.state(), LifecycleState::Closed);

        let (auth, ack) = server.await.expect("server");

        let auth: Value = serde_json::from_str(&auth).expect("auth json");
        assert_eq!(auth["type"], "authorization");
        assert_eq!(auth["data"]["token"], "Bearer tok-42");

        assert_eq!(ack, r#"{"type":"ack","messageId":"CANON"}"#);

        let dispatched = dispatched.lock().expect("dispatch lock");
        assert_eq!(dispatched.len(), 1, "exactly one handler invocation");
        assert_eq!(dispatched[0].0["inputs"]["vote"], "yes");
        assert_eq!(dispatched[0].1, "XYZ");
    }

    #[tokio::test]
    async fn test_malformed_frame_does_not_end_the_loop() {
        let (resolve_base, _requests) =
            spawn_http_stub(vec![(200, r#"{"id":"CANON"}"#.to_string())]).await;

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let notification = format!(
            r#"{{"data":{{"eventType":"conversation.activity","activity":{{
                "id":"XYZ","verb":"post",
                "target":{{"url":"{resolve_base}/conversations/ABC","id":"ABC"}}}}}}}}"#
        );

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(socket).await.expect("handshake");

            // Auth frame first.
            let _ = ws.next().await.expect("auth").expect("auth ok");

            // A garbage frame must only kill its own notification.
            ws.send(Message::Text("{garbage".into()))
                .await
                .expect("send garbage");
            ws.send(Message::Text(notification.into()))
                .await
                .expect("send notification");

            let ack = loop {
                match ws.next().await.expect("ack").expect("ack ok") {
                    Message::Text(text) => break text.as_str().to_string(),
                    _ => continue,
                }
            };

            ws.close(None).await.expect("close");
            ack
        });

        let dispatched: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&dispatched);

        let mut client = Client::builder()
            .access_token("t")
            .entity_fetcher(Arc::new(FakeFetcher {
                entity: json!({ "id": "CANON", "text": "still alive" }),
            }))
            .on_message(move |entity, _activity| {
                sink.lock().expect("dispatch lock").push(entity);
            })
            .build()
            .expect("build");
        client.device_info = Some(cached_device(Some(&format!("ws://{addr}"))));

        client.run().await.expect("run");

        let ack = server.await.expect("server");
        assert_eq!(ack, r#"{"type":"ack","messageId":"CANON"}"#);
        assert_eq!(dispatched.lock().expect("dispatch lock").len(), 1);
    }
}
