//! Entity fetch collaborator.
//!
//! Once a notification's canonical id is known, the full entity lives behind
//! the public REST API, not the websocket. The [`EntityFetcher`] trait is the
//! seam: the client ships a REST-backed default, and callers (or tests) can
//! substitute their own.
//!
//! The hydrated entity is a [`Value`] on purpose; its schema belongs to the
//! service, not to this client.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::MessageId;

use super::rest::RestClient;

// ============================================================================
// Constants
// ============================================================================

/// Default public API base URL.
pub const DEFAULT_API_URL: &str = "https://webexapis.com/v1";

// ============================================================================
// EntityFetcher
// ============================================================================

/// Resolves a canonical entity id into a fully hydrated object.
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    /// Fetches the full message for a canonical id.
    async fn fetch_message(&self, id: &MessageId) -> Result<Value>;

    /// Fetches the attachment-action record for a canonical id.
    async fn fetch_attachment_action(&self, id: &MessageId) -> Result<Value>;
}

// ============================================================================
// RestEntityFetcher
// ============================================================================

/// Default [`EntityFetcher`] backed by the public REST API.
#[derive(Debug, Clone)]
pub struct RestEntityFetcher {
    /// Authenticated REST client.
    rest: RestClient,

    /// API base URL, default [`DEFAULT_API_URL`].
    api_url: String,
}

impl RestEntityFetcher {
    /// Creates a fetcher against the default API endpoint.
    #[inline]
    #[must_use]
    pub fn new(rest: RestClient) -> Self {
        Self::with_api_url(rest, DEFAULT_API_URL)
    }

    /// Creates a fetcher against a custom API endpoint.
    #[must_use]
    pub fn with_api_url(rest: RestClient, api_url: impl Into<String>) -> Self {
        let mut api_url = api_url.into();
        while api_url.ends_with('/') {
            api_url.pop();
        }
        Self { rest, api_url }
    }
}

#[async_trait]
impl EntityFetcher for RestEntityFetcher {
    async fn fetch_message(&self, id: &MessageId) -> Result<Value> {
        let url = format!("{}/messages/{id}", self.api_url);
        debug!(%id, "Fetching message");
        self.rest.get_json(&url).await
    }

    async fn fetch_attachment_action(&self, id: &MessageId) -> Result<Value> {
        let url = format!("{}/attachment/actions/{id}", self.api_url);
        debug!(%id, "Fetching attachment action");
        self.rest.get_json(&url).await
    }
}

// ============================================================================
// Tests
// ============================================================================
