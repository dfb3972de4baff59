/// User account record
///
/// Owned by the credential store. Created once at registration; the
/// credential hash changes only through a rotation path this service does
/// not expose; never deleted here.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     name TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account
///
/// Secrets are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    /// Unique user id (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id credential hash (PHC string)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address
    pub email: String,

    /// Argon2id credential hash (not the plaintext secret)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,
}
