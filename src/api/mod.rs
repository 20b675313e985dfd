//! REST API client module for the MiniJira backend.
//!
//! This module provides the `ApiClient` that all network traffic goes
//! through. The client attaches the persisted bearer token to outgoing
//! requests, normalizes the backend's `{code, message, data}` response
//! envelope, and reports each failure to the `Notifier` exactly once.

pub mod client;
pub mod error;
pub mod notify;

pub use client::{ApiClient, AuthFailureHook};
pub use error::ApiError;
pub use notify::{ChannelNotifier, Notifier};
