//! Core event-to-entity translation and synchronization logic.
//!
//! The transport shell hands already-parsed event payloads to the
//! [`dispatcher`]; everything below it is independent of HTTP handling and
//! exercised against the [`tracking_client::TrackingStore`] seam in tests.

pub mod dispatcher;
pub mod identity;
pub mod reply;
pub mod review_sync;
pub mod revision_sync;
pub mod ticket_ref;
pub mod tracking_client;

pub use tracking_client::{TrackingClient, TrackingStore};
