//! Per-frame routing: parse, classify, resolve, ack, dispatch.
//!
//! Each inbound frame walks `Received → Parsed → Classified → {Dispatched |
//! Ignored}`. Dispatch resolves the canonical entity id, fetches the full
//! entity out-of-band, and, only if a handler is registered, acks the
//! notification over the open connection before invoking the handler. The
//! ack goes first so a slow or failing handler cannot trigger redelivery.
//!
//! The router holds no state across frames beyond its configuration: the
//! REST clients and the registered handlers.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use futures_util::{Sink, SinkExt};
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace};

use crate::api::{EntityFetcher, RestClient};
use crate::error::{Error, Result};
use crate::identifiers::MessageId;
use crate::protocol::{AckFrame, Activity, Classified, Frame, IgnoreReason};
use crate::resolve::resolve_canonical_id;

// ============================================================================
// Handler Types
// ============================================================================

/// Message handler callback type.
///
/// Called with the hydrated message and the raw activity after the
/// notification has been acked.
pub type MessageHandler = Box<dyn Fn(Value, Activity) + Send + Sync>;

/// Card-action handler callback type.
///
/// Called with the hydrated attachment-action record and the raw activity
/// after the notification has been acked.
pub type CardActionHandler = Box<dyn Fn(Value, Activity) + Send + Sync>;

// ============================================================================
// Router
// ============================================================================

/// Routes parsed frames to resolution and handler dispatch.
pub struct Router {
    /// REST client used for canonical-id resolution.
    rest: RestClient,

    /// Entity fetch collaborator.
    fetcher: Arc<dyn EntityFetcher>,

    /// Handler for hydrated messages.
    on_message: Option<MessageHandler>,

    /// Handler for hydrated attachment actions.
    on_card_action: Option<CardActionHandler>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("has_message_handler", &self.on_message.is_some())
            .field("has_card_action_handler", &self.on_card_action.is_some())
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Creates a router over the given collaborators and handlers.
    pub(crate) fn new(
        rest: RestClient,
        fetcher: Arc<dyn EntityFetcher>,
        on_message: Option<MessageHandler>,
        on_card_action: Option<CardActionHandler>,
    ) -> Self {
        Self {
            rest,
            fetcher,
            on_message,
            on_card_action,
        }
    }

    /// Processes one inbound frame body.
    ///
    /// Terminal either way: a dispatched or ignored frame ends processing,
    /// and the next frame starts fresh.
    ///
    /// # Errors
    ///
    /// Decode, resolution, fetch, and ack-write failures propagate; the
    /// receive loop logs them and moves on to the next frame.
    pub async fn route<S>(&self, text: &str, connection: &mut S) -> Result<()>
    where
        S: Sink<Message> + Unpin,
        S::Error: fmt::Display,
    {
        let frame = Frame::parse(text)?;

        match frame.classify()? {
            Classified::Message(activity) => self.dispatch_message(activity, connection).await,
            Classified::CardAction(activity) => {
                self.dispatch_card_action(activity, connection).await
            }
            Classified::Ignored(IgnoreReason::EventType(event_type)) => {
                trace!(event_type, "Ignoring non-conversation frame");
                Ok(())
            }
            Classified::Ignored(IgnoreReason::Verb(verb)) => {
                debug!(verb, "Ignoring unrecognized activity verb");
                Ok(())
            }
        }
    }

    /// Dispatches a `post` activity: resolve, fetch message, ack, invoke.
    async fn dispatch_message<S>(&self, activity: Activity, connection: &mut S) -> Result<()>
    where
        S: Sink<Message> + Unpin,
        S::Error: fmt::Display,
    {
        let id = resolve_canonical_id(&self.rest, &activity).await?;
        let message = self.fetcher.fetch_message(&id).await?;

        match &self.on_message {
            Some(handler) => {
                self.send_ack(id, connection).await?;
                handler(message, activity);
            }
            None => debug!(%id, "No message handler registered, not acking"),
        }

        Ok(())
    }

    /// Dispatches a `cardAction` activity: resolve, fetch action, ack, invoke.
    async fn dispatch_card_action<S>(&self, activity: Activity, connection: &mut S) -> Result<()>
    where
        S: Sink<Message> + Unpin,
        S::Error: fmt::Display,
    {
        let id = resolve_canonical_id(&self.rest, &activity).await?;
        let action = self.fetcher.fetch_attachment_action(&id).await?;

        match &self.on_card_action {
            Some(handler) => {
                self.send_ack(id, connection).await?;
                handler(action, activity);
            }
            None => debug!(%id, "No card-action handler registered, not acking"),
        }

        Ok(())
    }

    /// Sends an ack frame over the open connection. Fire-and-forget.
    async fn send_ack<S>(&self, id: MessageId, connection: &mut S) -> Result<()>
    where
        S: Sink<Message> + Unpin,
        S::Error: fmt::Display,
    {
        debug!(%id, "Acking notification");
        let json = serde_json::to_string(&AckFrame::new(id))?;

        connection
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| Error::connection(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
