//! REST collaborators.
//!
//! The websocket only ever carries minimal notifications; everything of
//! substance is fetched out-of-band over REST. This module holds the
//! authenticated JSON helper and the entity-fetch seam built on it.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `rest` | Bearer-authenticated JSON GET/POST |
//! | `entities` | [`EntityFetcher`] trait and REST default |

// ============================================================================
// Submodules
// ============================================================================

/// Bearer-authenticated JSON REST helper.
pub mod rest;

/// Entity fetch collaborator.
pub mod entities;

// ============================================================================
// Re-exports
// ============================================================================

pub use entities::{DEFAULT_API_URL, EntityFetcher, RestEntityFetcher};
pub use rest::RestClient;
