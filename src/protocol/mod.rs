//! Websocket protocol message types.
//!
//! This module defines the wire format of the three frame shapes this client
//! exchanges with the messaging service.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`Frame`] | Service → Client | Event notification |
//! | [`AuthorizationFrame`] | Client → Service | Bearer-token auth on open |
//! | [`AckFrame`] | Client → Service | Receipt acknowledgment |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `frame` | Inbound notification envelope and classification |
//! | `outbound` | Authorization and ack frames |

// ============================================================================
// Submodules
// ============================================================================

/// Inbound frame types and classification.
pub mod frame;

/// Outbound control frames.
pub mod outbound;

// ============================================================================
// Re-exports
// ============================================================================

pub use frame::{
    Activity, ActivityTarget, Classified, EVENT_CONVERSATION_ACTIVITY, Frame, FrameData,
    IgnoreReason, VERB_CARD_ACTION, VERB_POST,
};
pub use outbound::{AckFrame, AuthorizationData, AuthorizationFrame};
