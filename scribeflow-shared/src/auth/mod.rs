/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id credential hashing and verification
/// - [`jwt`]: bearer token issuing and verification (HS256)
/// - [`middleware`]: axum layer that turns a bearer token into an [`middleware::Identity`]
///
/// Tokens are stateless: there is no revocation list, and logout is an audit
/// event rather than an invalidation. See [`jwt`] for the trade-off.

pub mod jwt;
pub mod middleware;
pub mod password;
