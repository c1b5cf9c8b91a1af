//! Outbound control frames.
//!
//! Two frames ever leave this client: the authorization frame sent once on
//! open, and an ack frame per dispatched notification. Both are JSON-text
//! writes to the open connection; neither awaits a reply.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use crate::identifiers::{CorrelationId, MessageId};

// ============================================================================
// AuthorizationFrame
// ============================================================================

/// Bearer-token authorization frame, sent immediately on open.
///
/// # Format
///
/// ```json
/// {
///   "id": "uuid",
///   "type": "authorization",
///   "data": { "token": "Bearer <token>" }
/// }
/// ```
///
/// The service never acks this frame explicitly; the connection is simply
/// treated as authenticated once subsequent frames are accepted.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationFrame {
    /// Fresh random id.
    pub id: CorrelationId,

    /// Frame type marker (always "authorization").
    #[serde(rename = "type")]
    pub kind: &'static str,

    /// Token payload.
    pub data: AuthorizationData,
}

/// Token payload of an [`AuthorizationFrame`].
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationData {
    /// `Bearer <token>` string.
    pub token: String,
}

impl AuthorizationFrame {
    /// Creates an authorization frame for the given access token.
    #[must_use]
    pub fn new(access_token: &str) -> Self {
        Self {
            id: CorrelationId::generate(),
            kind: "authorization",
            data: AuthorizationData {
                token: format!("Bearer {access_token}"),
            },
        }
    }
}

// ============================================================================
// AckFrame
// ============================================================================

/// Receipt acknowledgment for a dispatched notification.
///
/// # Format
///
/// ```json
/// { "type": "ack", "messageId": "<canonical id>" }
/// ```
///
/// Sent before the handler runs, so a slow or failing handler cannot cause
/// the upstream service to redeliver the event. Fire-and-forget.
#[derive(Debug, Clone, Serialize)]
pub struct AckFrame {
    /// Frame type marker (always "ack").
    #[serde(rename = "type")]
    pub kind: &'static str,

    /// Canonical id of the acknowledged entity.
    #[serde(rename = "messageId")]
    pub message_id: MessageId,
}

impl AckFrame {
    /// Creates an ack frame for the given canonical entity id.
    #[inline]
    #[must_use]
    pub fn new(message_id: MessageId) -> Self {
        Self {
            kind: "ack",
            message_id,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
