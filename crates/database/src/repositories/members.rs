use crate::error::{DatabaseError, Result};
use campus_models::Member;
use sqlx::PgPool;
use uuid::Uuid;

/// Read-only lookup into the external identity store's member table.
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a member by id.
    pub async fn find_by_id(&self, member_id: Uuid) -> Result<Member> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(member_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Member", &member_id.to_string()))?;

        Ok(member)
    }
}
