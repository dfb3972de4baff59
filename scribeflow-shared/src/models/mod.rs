/// Domain models
///
/// # Models
///
/// - `user`: registered accounts and credential hashes
/// - `audit`: append-only user action log entries
/// - `article`: generated article content payloads (blog body, keywords,
///   analysis, images)
/// - `artifact`: persisted generation results, owned per user

pub mod article;
pub mod artifact;
pub mod audit;
pub mod user;
