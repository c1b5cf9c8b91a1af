//! Canonical entity id resolution.
//!
//! A notification's raw activity id cannot be handed to the entity fetch
//! endpoints directly: the full entity lives in the data center encoded in
//! the activity's collection URL. Resolution rewrites that URL onto the
//! correct entity collection, preserving the host, and asks the service
//! there for the canonical id.
//!
//! The rewrite is a pure function of the activity's fields, so redelivered
//! notifications resolve to the same canonical id every time.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::api::RestClient;
use crate::error::{Error, Result};
use crate::identifiers::MessageId;
use crate::protocol::{Activity, VERB_POST};

// ============================================================================
// URL rewrite
// ============================================================================

/// Rewrites the activity's collection URL onto the entity collection.
///
/// `conversations/{target.id}` becomes `messages/{activity.id}` for a `post`
/// verb and `attachment/actions/{activity.id}` for any other recognized
/// verb. The data-center-specific host is untouched.
///
/// # Errors
///
/// [`Error::MalformedActivity`] if the activity has no target reference.
pub fn rewrite_target_url(activity: &Activity) -> Result<String> {
    let target = activity
        .target
        .as_ref()
        .ok_or(Error::malformed_activity("target"))?;

    let collection = if activity.verb == VERB_POST {
        "messages"
    } else {
        "attachment/actions"
    };

    Ok(target.url.replace(
        &format!("conversations/{}", target.id),
        &format!("{collection}/{}", activity.id),
    ))
}

// ============================================================================
// Canonical id resolution
// ============================================================================

/// Resolves the canonical entity id for an activity.
///
/// Issues an authenticated GET against the rewritten URL and returns the
/// `id` field of the JSON response.
///
/// # Errors
///
/// - [`Error::MalformedActivity`] if the activity has no target reference
/// - [`Error::Http`] on network failure (no retry at this layer)
/// - [`Error::Protocol`] if the response carries no `id`
pub async fn resolve_canonical_id(rest: &RestClient, activity: &Activity) -> Result<MessageId> {
    let url = rewrite_target_url(activity)?;
    debug!(activity_id = %activity.id, verb = %activity.verb, url, "Resolving canonical id");

    let body = rest.get_json(&url).await?;
    let id = RestClient::required_str(&body, "id")?;

    Ok(MessageId::new(id))
}

// ============================================================================
// Tests
// ============================================================================
