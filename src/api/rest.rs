//! Bearer-authenticated JSON REST helper.
//!
//! Thin wrapper over [`reqwest::Client`] that attaches the access token and
//! decodes JSON bodies. Every REST interaction in this crate (device
//! directory, canonical-id resolution, entity fetch) goes through it.
//!
//! No retry at this layer: a failed call surfaces as [`Error::Http`] and the
//! caller decides whether that aborts startup or just one notification.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::error::{Error, Result};

// ============================================================================
// RestClient
// ============================================================================

/// Authenticated JSON REST client.
///
/// Cheap to clone; the underlying connection pool is shared. The token is
/// read-only after construction.
#[derive(Clone)]
pub struct RestClient {
    /// Shared HTTP client.
    http: reqwest::Client,

    /// Access token, sent as `Authorization: Bearer <token>`.
    access_token: String,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Creates a client for the given access token.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token: access_token.into(),
        }
    }

    /// Issues an authenticated GET and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// [`Error::Http`] on transport failure, non-success status, or a body
    /// that is not valid JSON.
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        trace!(url, "GET");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Issues an authenticated POST with a JSON body and decodes the reply.
    ///
    /// # Errors
    ///
    /// [`Error::Http`] on transport failure, non-success status, or a body
    /// that is not valid JSON.
    pub async fn post_json(&self, url: &str, body: &impl Serialize) -> Result<Value> {
        trace!(url, "POST");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Extracts a required string field from a JSON object.
    ///
    /// # Errors
    ///
    /// [`Error::Protocol`] if the field is absent or not a string.
    pub fn required_str<'a>(value: &'a Value, key: &str) -> Result<&'a str> {
        value
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::protocol(format!("response missing string field `{key}`")))
    }
}

// ============================================================================
// Tests
// ============================================================================
