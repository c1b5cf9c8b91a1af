//! Inbound frame types and classification.
//!
//! Every websocket frame the service pushes is a JSON envelope carrying an
//! event type and, for conversation events, an activity. A frame moves
//! through `Received → Parsed → Classified` here; dispatch of classified
//! frames belongs to the router.
//!
//! # Format
//!
//! ```json
//! {
//!   "data": {
//!     "eventType": "conversation.activity",
//!     "activity": {
//!       "id": "XYZ",
//!       "verb": "post",
//!       "target": { "url": "https://conv-a.example.com/conversations/ABC", "id": "ABC" }
//!     }
//!   }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::identifiers::ActivityId;

// ============================================================================
// Constants
// ============================================================================

/// The only actionable event type.
pub const EVENT_CONVERSATION_ACTIVITY: &str = "conversation.activity";

/// Verb for a posted message.
pub const VERB_POST: &str = "post";

/// Verb for a card (attachment action) submission.
pub const VERB_CARD_ACTION: &str = "cardAction";

// ============================================================================
// Frame
// ============================================================================

/// A parsed inbound websocket frame.
///
/// Ephemeral: exists only for the duration of processing one frame.
#[derive(Debug, Clone, Deserialize)]
pub struct Frame {
    /// Event payload.
    pub data: FrameData,
}

impl Frame {
    /// Decodes a frame from its JSON-text body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed payloads; the caller logs it and
    /// aborts processing of this one notification.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Classifies the frame by event type and verb.
    ///
    /// Only `conversation.activity` events are actionable; within those,
    /// `post` and `cardAction` verbs dispatch and anything else is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedActivity`] if a conversation event carries
    /// no activity.
    pub fn classify(self) -> Result<Classified> {
        if self.data.event_type != EVENT_CONVERSATION_ACTIVITY {
            return Ok(Classified::Ignored(IgnoreReason::EventType(
                self.data.event_type,
            )));
        }

        let activity = self
            .data
            .activity
            .ok_or(Error::malformed_activity("activity"))?;

        match activity.verb.as_str() {
            VERB_POST => Ok(Classified::Message(activity)),
            VERB_CARD_ACTION => Ok(Classified::CardAction(activity)),
            _ => Ok(Classified::Ignored(IgnoreReason::Verb(activity.verb))),
        }
    }
}

// ============================================================================
// FrameData
// ============================================================================

/// Event payload inside a frame envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameData {
    /// Event type discriminator.
    #[serde(rename = "eventType")]
    pub event_type: String,

    /// The conversational change, present for conversation events.
    #[serde(default)]
    pub activity: Option<Activity>,
}

// ============================================================================
// Activity
// ============================================================================

/// The unit of conversational change delivered inside a notification.
///
/// Fields beyond the ones this client routes on are retained in `extra`, so
/// the raw activity handed to handlers loses nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    /// Raw activity id.
    pub id: ActivityId,

    /// Activity verb (`post`, `cardAction`, or other).
    pub verb: String,

    /// Target reference used to locate the full entity.
    #[serde(default)]
    pub target: Option<ActivityTarget>,

    /// Remaining activity fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Target reference inside an activity: the conversation collection URL and
/// the target id within it.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityTarget {
    /// Collection URL; its host is data-center specific.
    pub url: String,

    /// Target id within the collection.
    pub id: String,
}

// ============================================================================
// Classified
// ============================================================================

/// Classification of a parsed frame.
///
/// `Dispatched` and `Ignored` are both terminal for a frame; the router is
/// stateless across frames.
#[derive(Debug, Clone)]
pub enum Classified {
    /// A posted message to resolve and dispatch.
    Message(Activity),

    /// A card submission to resolve and dispatch.
    CardAction(Activity),

    /// Nothing to do for this frame.
    Ignored(IgnoreReason),
}

/// Why a frame was ignored. Ignored frames are logged, never errors.
#[derive(Debug, Clone)]
pub enum IgnoreReason {
    /// Event type other than `conversation.activity`.
    EventType(String),

    /// Conversation activity with an unrecognized verb.
    Verb(String),
}

// ============================================================================
// Tests
// ============================================================================
