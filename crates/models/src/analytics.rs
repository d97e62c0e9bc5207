use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-campus membership rollup computed from the assignment store.
///
/// Transferred assignments never count here; they stay visible through the
/// transfer ledger instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampusStat {
    pub campus_id: Uuid,
    pub campus_name: String,
    pub total_members: i64,
    pub active_members: i64,
    pub inactive_members: i64,
    pub primary_members: i64,
    pub recent_joins: i64,
}
