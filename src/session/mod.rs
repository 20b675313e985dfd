//! Session state and its durable storage.
//!
//! This module provides:
//! - `Storage`: a file-backed key-value store that survives restarts
//! - `SessionStore`: the canonical in-memory session (token + profile)
//!
//! The store is the single owner of session state. The API client and the
//! navigation guard receive a `SharedSession` handle and read the persisted
//! token through it.

pub mod storage;
pub mod store;

pub use storage::{keys, Storage};
pub use store::{SessionStore, SharedSession};
