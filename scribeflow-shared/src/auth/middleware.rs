/// Identity middleware for axum
///
/// Extracts the bearer token from each inbound request, verifies it through
/// the token service, and injects the resulting [`Identity`] into the
/// request extensions for downstream handlers. The middleware is a pure
/// gate: it either rejects the request or passes it through unchanged, with
/// no cross-request caching and no other side effects.
///
/// Every failure — missing header, malformed header, expired token, forged
/// token — collapses into the same `401` response. Telling a caller *why*
/// their credential failed is an oracle.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use scribeflow_shared::auth::middleware::{bearer_auth, Identity};
///
/// async fn whoami(Extension(identity): Extension<Identity>) -> String {
///     identity.email
/// }
///
/// let app: Router = Router::new()
///     .route("/me", get(whoami))
///     .layer(middleware::from_fn(bearer_auth("signing-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{verify_token, Claims};

/// Verified claim set for the duration of one request
///
/// Derived from a valid bearer token; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated user id
    pub subject_id: Uuid,

    /// Account email carried in the token
    pub email: String,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,

    /// When the token stops validating
    pub expires_at: DateTime<Utc>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.sub,
            email: claims.email.clone(),
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        }
    }
}

/// Error type for the identity middleware
///
/// Variants exist for logging; the response shape is identical for all of
/// them.
#[derive(Debug)]
pub enum AuthError {
    /// Authorization header absent
    MissingCredentials,

    /// Authorization header present but not a bearer credential
    MalformedHeader,

    /// Token failed verification (signature, expiry, issuer, structure)
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingCredentials => {
                tracing::debug!("Rejecting request with no authorization header");
            }
            AuthError::MalformedHeader => {
                tracing::debug!("Rejecting request with malformed authorization header");
            }
            AuthError::InvalidToken(detail) => {
                tracing::debug!(detail = %detail, "Rejecting request with invalid token");
            }
        }

        // One body for every failure mode.
        let body = Json(serde_json::json!({
            "error": "unauthorized",
            "message": "Invalid authentication credentials",
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Bearer authentication middleware
///
/// Validates `Authorization: Bearer <token>` against the signing secret and
/// injects [`Identity`] on success.
pub async fn bearer_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?;

    let claims =
        verify_token(token, &secret).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    req.extensions_mut().insert(Identity::from(claims));

    Ok(next.run(req).await)
}

/// Creates a bearer authentication middleware closure
///
/// Captures the signing secret so the middleware can be attached with
/// `axum::middleware::from_fn`.
pub fn bearer_auth(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(bearer_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Claims;
    use chrono::Duration;

    #[test]
    fn test_identity_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "user@example.com", Duration::minutes(30));

        let identity = Identity::from(claims);

        assert_eq!(identity.subject_id, user_id);
        assert_eq!(identity.email, "user@example.com");
        assert!(identity.expires_at > identity.issued_at);
    }

    #[test]
    fn test_all_auth_errors_map_to_401() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::MalformedHeader,
            AuthError::InvalidToken("expired".to_string()),
            AuthError::InvalidToken("bad signature".to_string()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
