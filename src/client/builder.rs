//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and creating [`Client`] instances.
//!
//! # Example
//!
//! ```no_run
//! use webex_websocket_client::Client;
//!
//! # fn example() -> webex_websocket_client::Result<()> {
//! let client = Client::builder()
//!     .access_token("token")
//!     .on_message(|message, _activity| {
//!         println!("message: {message}");
//!     })
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::api::{DEFAULT_API_URL, EntityFetcher, RestClient, RestEntityFetcher};
use crate::device::{DEFAULT_DEVICE_URL, DeviceRegistry};
use crate::error::{Error, Result};
use crate::protocol::Activity;
use crate::router::{CardActionHandler, MessageHandler, Router};

use super::core::Client;

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`] instance.
///
/// Use [`Client::builder()`] to create a new builder. Only the access token
/// is required; both endpoint URLs default to the production service.
pub struct ClientBuilder {
    /// Bearer access token.
    access_token: Option<String>,

    /// Device directory base URL.
    device_url: String,

    /// Entity API base URL.
    api_url: String,

    /// Handler for hydrated messages.
    on_message: Option<MessageHandler>,

    /// Handler for hydrated attachment actions.
    on_card_action: Option<CardActionHandler>,

    /// Entity fetch collaborator override.
    fetcher: Option<Arc<dyn EntityFetcher>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            access_token: None,
            device_url: DEFAULT_DEVICE_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            on_message: None,
            on_card_action: None,
            fetcher: None,
        }
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("device_url", &self.device_url)
            .field("api_url", &self.api_url)
            .field("has_message_handler", &self.on_message.is_some())
            .field("has_card_action_handler", &self.on_card_action.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ClientBuilder Implementation
// ============================================================================

impl ClientBuilder {
    /// Creates a new builder with default endpoints and no token.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bearer access token. Required.
    ///
    /// Used for REST `Authorization` headers and the websocket
    /// authorization frame.
    #[inline]
    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Overrides the device directory base URL.
    #[inline]
    #[must_use]
    pub fn device_url(mut self, url: impl Into<String>) -> Self {
        self.device_url = url.into();
        self
    }

    /// Overrides the entity API base URL.
    #[inline]
    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Registers the message handler.
    ///
    /// Called with the hydrated message and the raw activity for every
    /// `post` notification. Without a handler, messages are resolved but
    /// never acked or dispatched.
    #[must_use]
    pub fn on_message<F>(mut self, handler: F) -> Self
    where
        F: Fn(Value, Activity) + Send + Sync + 'static,
    {
        self.on_message = Some(Box::new(handler));
        self
    }

    /// Registers the card-action handler.
    ///
    /// Called with the hydrated attachment-action record and the raw
    /// activity for every `cardAction` notification.
    #[must_use]
    pub fn on_card_action<F>(mut self, handler: F) -> Self
    where
        F: Fn(Value, Activity) + Send + Sync + 'static,
    {
        self.on_card_action = Some(Box::new(handler));
        self
    }

    /// Overrides the entity fetch collaborator.
    ///
    /// Defaults to the REST-backed fetcher against the configured API URL.
    #[inline]
    #[must_use]
    pub fn entity_fetcher(mut self, fetcher: Arc<dyn EntityFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Builds the client with validation.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the access token is missing or either endpoint
    /// URL does not parse.
    pub fn build(self) -> Result<Client> {
        let access_token = self.access_token.ok_or_else(|| {
            Error::config(
                "Access token is required. Use .access_token() to set it.\n\
                 Example: Client::builder().access_token(\"<bot token>\")",
            )
        })?;

        validate_url("device_url", &self.device_url)?;
        validate_url("api_url", &self.api_url)?;

        let rest = RestClient::new(access_token.clone());
        let fetcher = self.fetcher.unwrap_or_else(|| {
            Arc::new(RestEntityFetcher::with_api_url(
                rest.clone(),
                self.api_url.as_str(),
            ))
        });

        let registry = DeviceRegistry::new(rest.clone(), self.device_url);
        let router = Router::new(rest, fetcher, self.on_message, self.on_card_action);

        Ok(Client::new(registry, router, access_token))
    }
}

/// Validates that a configured endpoint parses as an absolute URL.
fn validate_url(name: &str, value: &str) -> Result<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| Error::config(format!("Invalid {name} `{value}`: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
