/// JWT token service
///
/// This module issues and verifies the signed bearer tokens that authenticate
/// pipeline invocations. Tokens are self-contained: the payload carries the
/// subject id, the account email, and an absolute expiry instant, signed with
/// a single process-wide secret.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256), fixed — no algorithm
///   negotiation with the client
/// - **Expiration**: configurable TTL, validated on every `verify_token` call
/// - **Statelessness**: there is no server-side revocation list. Logging out
///   only records an audit entry; an unexpired token keeps verifying until
///   its `exp` passes. Rotating the signing secret invalidates every
///   outstanding token immediately.
///
/// # Example
///
/// ```
/// use scribeflow_shared::auth::jwt::{issue_token, verify_token};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-secret-key-at-least-32-bytes-long";
///
/// let token = issue_token(user_id, "user@example.com", Duration::minutes(60), secret)?;
/// let claims = verify_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim baked into every token.
const ISSUER: &str = "scribeflow";

/// Error type for token operations
///
/// Callers must collapse every verification failure into a single
/// `Unauthorized` outcome before it reaches a client; distinguishing an
/// expired token from a forged one is an oracle.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign a new token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, issuer, structure, or claim validation failed
    #[error("Token validation failed: {0}")]
    Invalid(String),
}

/// Claim set carried by a bearer token
///
/// `sub`/`email` identify the account; `iat`/`exp` bound the token's
/// lifetime as Unix timestamps. Never persisted — reconstructed from the
/// token on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Account email
    pub email: String,

    /// Issuer - always "scribeflow"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates a claim set expiring `ttl` from now
    pub fn new(subject_id: Uuid, email: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject_id,
            email: email.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks if the claim set has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Issued-at instant
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_else(Utc::now)
    }

    /// Expiry instant
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_else(Utc::now)
    }
}

/// Issues a signed bearer token for a subject
///
/// Stateless: nothing is recorded server-side.
///
/// # Errors
///
/// Returns `TokenError::CreateError` if signing fails
pub fn issue_token(
    subject_id: Uuid,
    email: &str,
    ttl: Duration,
    secret: &str,
) -> Result<String, TokenError> {
    let claims = Claims::new(subject_id, email, ttl);
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, &claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a bearer token and extracts its claims
///
/// Checks the HS256 signature, the issuer, and the expiry against the
/// current time. A token signed with a rotated secret fails here like any
/// tampered token.
///
/// # Errors
///
/// Returns `TokenError::Expired` for an out-of-date token and
/// `TokenError::Invalid` for everything else (bad signature, wrong issuer,
/// malformed structure, missing claims).
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    // No expiry leeway: a zero-ttl token must fail verification, not ride a
    // grace window.
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(format!("{}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "user@example.com", Duration::minutes(60));

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.iss, "scribeflow");
        assert!(!claims.is_expired());
        assert!(claims.expires_at() > claims.issued_at());
    }

    #[test]
    fn test_issue_and_verify_token() {
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, "user@example.com", Duration::minutes(60), SECRET)
            .expect("Should issue token");

        let claims = verify_token(&token, SECRET).expect("Should verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.iss, "scribeflow");
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), "a@b.com", Duration::minutes(60), "secret-one")
            .expect("Should issue token");

        let result = verify_token(&token, "a-different-secret");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_after_secret_rotation_fails_for_all_prior_tokens() {
        let tokens: Vec<String> = (0..3)
            .map(|i| {
                issue_token(
                    Uuid::new_v4(),
                    &format!("user{}@example.com", i),
                    Duration::minutes(60),
                    SECRET,
                )
                .unwrap()
            })
            .collect();

        let rotated = "rotated-secret-key-also-32-bytes-long!!";
        for token in &tokens {
            assert!(verify_token(token, rotated).is_err());
        }
    }

    #[test]
    fn test_zero_ttl_token_fails_verification() {
        // A zero-ttl token is expired the instant it is issued; use a
        // slightly negative ttl so the check cannot race the clock's
        // current second.
        let token = issue_token(Uuid::new_v4(), "a@b.com", Duration::seconds(-1), SECRET)
            .expect("Should issue token");

        assert!(matches!(verify_token(&token, SECRET), Err(TokenError::Expired)));

        let claims = Claims::new(Uuid::new_v4(), "a@b.com", Duration::zero());
        assert!(claims.is_expired());
    }

    #[test]
    fn test_expired_token() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.com", Duration::seconds(-3600));
        assert!(claims.is_expired());

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        let token = encode(&header, &claims, &key).unwrap();

        let result = verify_token(&token, SECRET);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_token_is_invalid_not_panic() {
        assert!(verify_token("not-a-token", SECRET).is_err());
        assert!(verify_token("", SECRET).is_err());
        assert!(verify_token("a.b.c", SECRET).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        #[derive(Serialize)]
        struct ForeignClaims {
            sub: Uuid,
            email: String,
            iss: String,
            iat: i64,
            exp: i64,
        }

        let foreign = ForeignClaims {
            sub: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            iss: "someone-else".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        let token = encode(&header, &foreign, &key).unwrap();

        assert!(matches!(verify_token(&token, SECRET), Err(TokenError::Invalid(_))));
    }
}
