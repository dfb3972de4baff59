/// API route handlers
///
/// Organized by resource:
///
/// - `health`: liveness and service info
/// - `auth`: registration, login, logout, identity, history
/// - `generate`: pipeline invocation and cost estimation
/// - `blogs`: stored artifact retrieval

pub mod auth;
pub mod blogs;
pub mod generate;
pub mod health;
