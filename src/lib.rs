//! Persistent websocket event client for Webex-style messaging services.
//!
//! This library maintains a single long-lived websocket connection to the
//! service, authenticates it, and turns minimal event notifications into
//! fully hydrated domain objects delivered to caller-supplied handlers.
//!
//! # Architecture
//!
//! The pipeline for each notification:
//!
//! 1. **Device registry** resolves or creates the device record whose
//!    `webSocketUrl` the connection targets.
//! 2. **Router** parses each inbound frame and classifies it by event type
//!    and verb; only `conversation.activity` frames are actionable.
//! 3. **Resolver** rewrites the activity's collection URL onto the entity
//!    collection and fetches the canonical, location-aware entity id.
//! 4. The **entity fetcher** hydrates the full message or attachment-action
//!    record out-of-band over REST.
//! 5. An **ack** goes out over the connection, then the handler runs.
//!
//! Acks are sent only when a handler is registered, and always before the
//! handler is invoked, so a slow handler cannot cause redelivery.
//!
//! # Quick Start
//!
//! ```no_run
//! use webex_websocket_client::{Client, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut client = Client::builder()
//!         .access_token(std::env::var("ACCESS_TOKEN").expect("ACCESS_TOKEN"))
//!         .on_message(|message, _activity| {
//!             println!("message: {message}");
//!         })
//!         .on_card_action(|action, _activity| {
//!             println!("card action: {action}");
//!         })
//!         .build()?;
//!
//!     // Blocks until the connection closes or errors; no auto-reconnect.
//!     client.run().await
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | REST collaborators: authenticated JSON client, entity fetch |
//! | [`client`] | Client builder and connection lifecycle |
//! | [`device`] | Device registration and discovery |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe id wrappers |
//! | [`protocol`] | Websocket frame types (inbound and outbound) |
//! | [`resolve`] | Canonical entity id resolution |
//! | [`router`] | Per-frame routing and handler dispatch |
//!
//! # Delivery semantics
//!
//! Frames are processed strictly in arrival order on the connection's
//! receive task; REST lookups are awaited inline, so backpressure is
//! implicit and total. Unrecognized verbs are logged and dropped, never
//! acked. Failures while processing one notification are logged and do not
//! affect the next frame.

// ============================================================================
// Modules
// ============================================================================

/// REST collaborators.
///
/// Authenticated JSON helper plus the [`EntityFetcher`] seam with its
/// REST-backed default.
pub mod api;

/// Client factory and connection lifecycle.
///
/// Use [`Client::builder()`] to create a configured client instance.
pub mod client;

/// Device registration and discovery.
///
/// Resolves or creates the device record that carries the websocket
/// endpoint.
pub mod device;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for protocol entities.
///
/// Newtype wrappers prevent mixing incompatible ids at compile time.
pub mod identifiers;

/// Websocket protocol message types.
pub mod protocol;

/// Canonical entity id resolution.
pub mod resolve;

/// Per-frame routing and handler dispatch.
pub mod router;

#[cfg(test)]
pub(crate) mod testutil;

// ============================================================================
// Re-exports
// ============================================================================

// API types
pub use api::{DEFAULT_API_URL, EntityFetcher, RestClient, RestEntityFetcher};

// Client types
pub use client::{Client, ClientBuilder, LifecycleState};

// Device types
pub use device::{DEFAULT_DEVICE_URL, DeviceRecord, DeviceRegistry};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ActivityId, CorrelationId, MessageId};

// Protocol types
pub use protocol::{
    AckFrame, Activity, ActivityTarget, AuthorizationFrame, Classified, Frame, IgnoreReason,
};

// Router types
pub use router::{CardActionHandler, MessageHandler, Router};
