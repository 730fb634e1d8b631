//! tracker-webhooks - projects GitHub webhook events onto tracking-system
//! entities.
//!
//! Push events become immutable revision records; pull-request assignment,
//! unassignment and edit events become ticket field mutations and replies.
//! The webhook listener in [`server`] is a thin shell; the translation
//! logic lives under [`services`].

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
