/// Authentication endpoints
///
/// - `POST /auth/register` — create an account
/// - `POST /auth/login` — verify credentials, issue a bearer token
/// - `POST /auth/logout` — record a logout audit entry
/// - `GET  /auth/me` — current identity claims
/// - `GET  /auth/history` — audit trail, newest first
///
/// Tokens are stateless, so logout is an audit event only: a previously
/// issued, unexpired token keeps working afterwards. Clients discard the
/// token; the server records that they said goodbye.

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;
use uuid::Uuid;
use validator::Validate;

use scribeflow_shared::auth::jwt;
use scribeflow_shared::auth::middleware::Identity;
use scribeflow_shared::auth::password;
use scribeflow_shared::models::audit::{AuditAction, AuditEntry};
use scribeflow_shared::models::user::{NewUser, UserRecord};
use scribeflow_shared::store::{record_action, CredentialStore};

/// Default number of history entries returned
const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Account secret
    #[validate(length(min = 8, message = "Secret must be at least 8 characters"))]
    pub secret: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Register response (never includes the credential hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User id
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display name, when provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Account creation time
    pub created_at: DateTime<Utc>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Account secret
    pub secret: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Signed bearer token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,

    /// Seconds until the token expires
    pub expires_in_seconds: i64,
}

/// History query parameters
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Maximum entries to return (default 50)
    pub limit: Option<i64>,
}

/// Register a new user
///
/// # Errors
///
/// - `400`: validation failed
/// - `409`: email already registered (including the insert-time race)
/// - `503`: store unconfigured
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    let stores = state.stores()?;

    req.validate().map_err(validation_details)?;
    password::validate_secret_strength(&req.secret).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "secret".to_string(),
            message,
        }])
    })?;

    let password_hash = password::hash_secret(&req.secret)?;

    let user = stores
        .users
        .create_user(NewUser {
            email: req.email,
            password_hash,
            name: req.name,
        })
        .await
        .map_err(|e| match e {
            scribeflow_shared::store::StoreError::Duplicate => {
                ApiError::Conflict("Email already registered".to_string())
            }
            other => other.into(),
        })?;

    record_action(stores.audit.as_ref(), user.id, AuditAction::Register, json!({})).await;
    tracing::info!(user_id = %user.id, email = %user.email, "New user registered");

    Ok(Json(UserResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
    }))
}

/// Login: verify credentials and issue a bearer token
///
/// # Errors
///
/// - `401`: bad credentials ("no such account" and "wrong secret" are the
///   same outcome, in shape and in timing class)
/// - `503`: store or signing secret unconfigured
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let stores = state.stores()?;
    let auth = state.auth_config()?;

    req.validate().map_err(validation_details)?;

    let user = authenticate(stores.users.as_ref(), &req.email, &req.secret)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or secret".to_string()))?;

    let ttl = Duration::minutes(auth.token_ttl_minutes);
    let access_token = jwt::issue_token(user.id, &user.email, ttl, &auth.jwt_secret)?;

    record_action(stores.audit.as_ref(), user.id, AuditAction::Login, json!({})).await;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in_seconds: auth.token_ttl_minutes * 60,
    }))
}

/// Logout: record the audit entry
///
/// Stateless tokens cannot be revoked server-side; the token stays valid
/// until expiry.
pub async fn logout(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<serde_json::Value>> {
    let stores = state.stores()?;

    record_action(
        stores.audit.as_ref(),
        identity.subject_id,
        AuditAction::Logout,
        json!({}),
    )
    .await;
    tracing::info!(user_id = %identity.subject_id, "User logged out");

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// Current identity claims
pub async fn me(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}

/// Audit trail for the current identity, newest first
pub async fn history(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<Vec<AuditEntry>>> {
    let stores = state.stores()?;

    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);
    let entries = stores
        .audit
        .list_for_user(identity.subject_id, limit)
        .await?;

    Ok(Json(entries))
}

/// Looks up and verifies credentials
///
/// A missing account and a wrong secret return the same `None`. The
/// missing-account path still burns one hash verification so the two cases
/// stay in the same timing class.
async fn authenticate(
    store: &dyn CredentialStore,
    email: &str,
    secret: &str,
) -> Result<Option<UserRecord>, ApiError> {
    match store.find_by_email(email).await? {
        Some(user) => {
            if password::verify_secret(secret, &user.password_hash).unwrap_or(false) {
                Ok(Some(user))
            } else {
                Ok(None)
            }
        }
        None => {
            let _ = password::verify_secret(secret, dummy_hash());
            Ok(None)
        }
    }
}

/// A throwaway hash verified on the missing-account path
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        password::hash_secret("scribeflow-timing-equalizer").unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            email: "user@example.com".to_string(),
            secret: "longenough".to_string(),
            name: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            secret: "longenough".to_string(),
            name: None,
        };
        assert!(bad_email.validate().is_err());

        let short_secret = RegisterRequest {
            email: "user@example.com".to_string(),
            secret: "short".to_string(),
            name: None,
        };
        assert!(short_secret.validate().is_err());
    }

    #[test]
    fn test_dummy_hash_is_a_valid_phc_string() {
        assert!(dummy_hash().starts_with("$argon2id$"));
        assert!(!password::verify_secret("anything", dummy_hash()).unwrap());
    }
}
