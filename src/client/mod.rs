//! Client factory and connection lifecycle.
//!
//! Use [`Client::builder()`] to configure a client, then [`Client::run`] to
//! open the connection and process notifications until it closes.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | Fluent configuration with build-time validation |
//! | `core` | Coordinator, lifecycle state machine, receive loop |

// ============================================================================
// Submodules
// ============================================================================

/// Builder pattern for client configuration.
pub mod builder;

/// Client coordinator and connection run loop.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use core::{Client, LifecycleState};
