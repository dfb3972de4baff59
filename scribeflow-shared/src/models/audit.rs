/// Append-only audit trail entries
///
/// One entry is recorded per significant user action. Entries are immutable:
/// there is no update or delete path, only appends and a newest-first read.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE audit_log (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL,
///     action TEXT NOT NULL,
///     data JSONB NOT NULL DEFAULT '{}',
///     timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

/// Actions recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Account created
    Register,

    /// Token issued after credential check
    Login,

    /// Client announced logout (the token itself stays valid until expiry)
    Logout,

    /// Pipeline run completed and an artifact was persisted
    GenerateBlog,
}

impl AuditAction {
    /// String form stored in the audit log
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Register => "register",
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::GenerateBlog => "generate_blog",
        }
    }

    /// Parses the stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "register" => Some(AuditAction::Register),
            "login" => Some(AuditAction::Login),
            "logout" => Some(AuditAction::Logout),
            "generate_blog" => Some(AuditAction::GenerateBlog),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Entry id
    pub id: Uuid,

    /// User the action belongs to
    pub user_id: Uuid,

    /// Action name (see [`AuditAction`])
    pub action: String,

    /// Opaque action payload
    pub data: JsonValue,

    /// When the action happened
    pub timestamp: DateTime<Utc>,
}
