use crate::error::Result;
use campus_models::{CampusMemberRole, NewRoleGrant};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Persistence for campus-scoped role grants.
#[derive(Clone)]
pub struct CampusRoleRepository {
    pool: PgPool,
}

impl CampusRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a role grant. The caller is responsible for having verified,
    /// under lock, that the member holds an active assignment at the campus.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        new: &NewRoleGrant,
    ) -> Result<CampusMemberRole> {
        let role = sqlx::query_as::<_, CampusMemberRole>(
            r#"
            INSERT INTO campus_member_roles
                (member_id, campus_id, title, description, permissions, assigned_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.member_id)
        .bind(new.campus_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.permissions)
        .bind(new.assigned_by)
        .fetch_one(conn)
        .await?;

        Ok(role)
    }

    /// List a member's active role grants, optionally narrowed to one campus.
    pub async fn list_active(
        &self,
        member_id: Uuid,
        campus_id: Option<Uuid>,
    ) -> Result<Vec<CampusMemberRole>> {
        let roles = if let Some(campus_id) = campus_id {
            sqlx::query_as::<_, CampusMemberRole>(
                r#"
                SELECT * FROM campus_member_roles
                WHERE member_id = $1 AND campus_id = $2 AND is_active = true
                ORDER BY start_date ASC
                "#,
            )
            .bind(member_id)
            .bind(campus_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, CampusMemberRole>(
                r#"
                SELECT * FROM campus_member_roles
                WHERE member_id = $1 AND is_active = true
                ORDER BY start_date ASC
                "#,
            )
            .bind(member_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(roles)
    }

    /// Lock the member's active role grants at a campus for the surrounding
    /// transaction and return them in snapshot order.
    pub async fn lock_active(
        &self,
        conn: &mut PgConnection,
        member_id: Uuid,
        campus_id: Uuid,
    ) -> Result<Vec<CampusMemberRole>> {
        let roles = sqlx::query_as::<_, CampusMemberRole>(
            r#"
            SELECT * FROM campus_member_roles
            WHERE member_id = $1 AND campus_id = $2 AND is_active = true
            ORDER BY start_date ASC
            FOR UPDATE NOWAIT
            "#,
        )
        .bind(member_id)
        .bind(campus_id)
        .fetch_all(conn)
        .await?;

        Ok(roles)
    }

    /// Close every active role grant for the (member, campus) pair, stamping
    /// `end_date = at`. Idempotent: with nothing left to close, the result is
    /// simply empty.
    pub async fn close_roles(
        &self,
        conn: &mut PgConnection,
        member_id: Uuid,
        campus_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Vec<CampusMemberRole>> {
        let closed = sqlx::query_as::<_, CampusMemberRole>(
            r#"
            UPDATE campus_member_roles
            SET is_active = false, end_date = $3
            WHERE member_id = $1 AND campus_id = $2 AND is_active = true
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(campus_id)
        .bind(at)
        .fetch_all(conn)
        .await?;

        Ok(closed)
    }
}
