//! Error types for the websocket event client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webex_websocket_client::{Client, Result};
//!
//! async fn example(client: &mut Client) -> Result<()> {
//!     client.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Registration | [`Error::Registration`], [`Error::MissingWebSocketUrl`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`] |
//! | Notification | [`Error::Protocol`], [`Error::MalformedActivity`] |
//! | External | [`Error::Http`], [`Error::Json`], [`Error::WebSocket`] |
//!
//! Only configuration and registration errors are fatal to startup; a
//! notification-level error aborts processing of one frame and is logged by
//! the receive loop.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Client configuration error.
    ///
    /// Returned when builder configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Registration Errors
    // ========================================================================
    /// Device registration failed.
    ///
    /// Returned when the device directory yields no usable device record.
    /// Fatal: the client cannot open a connection without one.
    #[error("Device registration failed: {message}")]
    Registration {
        /// Description of the registration failure.
        message: String,
    },

    /// Device record carries no websocket endpoint.
    ///
    /// Returned when the registered device has no `webSocketUrl`.
    /// Fatal: there is nothing to connect to.
    #[error("Device record has no websocket endpoint")]
    MissingWebSocketUrl,

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Websocket connection failed.
    ///
    /// Returned when the connection cannot be established or a frame
    /// cannot be written.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Websocket connection closed unexpectedly.
    ///
    /// Returned when the connection is lost during operation.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Notification Errors
    // ========================================================================
    /// Protocol violation or unexpected payload.
    ///
    /// Returned when an inbound frame or REST response has an invalid shape,
    /// e.g. a resolution response without an `id` field.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Activity is missing a field required for resolution.
    ///
    /// Returned when an actionable activity lacks the target reference
    /// needed to derive its canonical entity id.
    #[error("Malformed activity: missing {field}")]
    MalformedActivity {
        /// The missing field.
        field: &'static str,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// HTTP request error from the REST collaborator.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a registration error.
    #[inline]
    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a malformed activity error.
    #[inline]
    pub fn malformed_activity(field: &'static str) -> Self {
        Self::MalformedActivity { field }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error is fatal to startup.
    ///
    /// Fatal errors mean the client cannot reach the `Open` state at all;
    /// everything else is scoped to one notification or the transport.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Registration { .. } | Self::MissingWebSocketUrl
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error aborts only one notification.
    #[inline]
    #[must_use]
    pub fn is_notification_error(&self) -> bool {
        matches!(
            self,
            Self::Protocol { .. } | Self::MalformedActivity { .. } | Self::Http(_) | Self::Json(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
