use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One site (physical or virtual) of a multi-campus organization.
///
/// Campus identity is owned by the campus directory; this core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Campus {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
