use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tracks revocation and expiry for a minted portal token. The token
/// string itself is never persisted — only its signed claims are checked
/// cryptographically; this row exists purely so a token can be revoked.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct PortalToken {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}
