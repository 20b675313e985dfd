//! Data models for MiniJira entities.
//!
//! This module contains the structures the backend serves as JSON:
//!
//! - `Project`: a container for issues
//! - `Issue` with its `IssueStatus` / `IssuePriority` enums
//! - `AuthResponse`: the login result carrying the bearer token
//! - `DashboardStats`: aggregate counts for the dashboard screen

pub mod auth;
pub mod issue;
pub mod project;
pub mod stats;

pub use auth::AuthResponse;
pub use issue::{Issue, IssuePriority, IssueStatus, IssueUpdate};
pub use project::Project;
pub use stats::DashboardStats;
