use crate::error::Result;
use campus_models::{
    AssignmentStatus, AssignmentWithCampus, MemberCampusAssignment, NewAssignment,
};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Persistence for member-campus assignment records.
///
/// Reads run against the pool. Anything that participates in a multi-step
/// unit takes a `&mut PgConnection` so the caller controls the transaction;
/// the transfer orchestrator is the only caller composing writes across
/// repositories.
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a member's assignments within an organization, primary first,
    /// then by campus name.
    pub async fn list_for_member(
        &self,
        member_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Vec<AssignmentWithCampus>> {
        let assignments = sqlx::query_as::<_, AssignmentWithCampus>(
            r#"
            SELECT
                a.id, a.member_id, a.campus_id, a.organization_id,
                a.is_primary, a.status, a.assigned_at, a.note,
                a.assigned_by, a.transferred_from_campus_id,
                c.name AS campus_name
            FROM member_campus_assignments a
            INNER JOIN campuses c ON a.campus_id = c.id
            WHERE a.member_id = $1 AND a.organization_id = $2
            ORDER BY a.is_primary DESC, c.name ASC
            "#,
        )
        .bind(member_id)
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    /// List active assignments across an organization, optionally narrowed
    /// to one campus.
    pub async fn list_by_campus(
        &self,
        organization_id: Uuid,
        campus_id: Option<Uuid>,
    ) -> Result<Vec<MemberCampusAssignment>> {
        let assignments = if let Some(campus_id) = campus_id {
            sqlx::query_as::<_, MemberCampusAssignment>(
                r#"
                SELECT * FROM member_campus_assignments
                WHERE organization_id = $1 AND campus_id = $2 AND status = 'active'
                ORDER BY assigned_at ASC
                "#,
            )
            .bind(organization_id)
            .bind(campus_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, MemberCampusAssignment>(
                r#"
                SELECT * FROM member_campus_assignments
                WHERE organization_id = $1 AND status = 'active'
                ORDER BY assigned_at ASC
                "#,
            )
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(assignments)
    }

    /// Lock the member's active assignment rows for the duration of the
    /// surrounding transaction. NOWAIT keeps the wait bounded; a held lock
    /// surfaces as `DatabaseError::LockNotAvailable`.
    pub async fn lock_member_assignments(
        &self,
        conn: &mut PgConnection,
        member_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Vec<MemberCampusAssignment>> {
        let assignments = sqlx::query_as::<_, MemberCampusAssignment>(
            r#"
            SELECT * FROM member_campus_assignments
            WHERE member_id = $1 AND organization_id = $2 AND status = 'active'
            FOR UPDATE NOWAIT
            "#,
        )
        .bind(member_id)
        .bind(organization_id)
        .fetch_all(conn)
        .await?;

        Ok(assignments)
    }

    /// Find the active assignment for a (member, campus) pair, if any.
    pub async fn find_active(
        &self,
        conn: &mut PgConnection,
        member_id: Uuid,
        campus_id: Uuid,
    ) -> Result<Option<MemberCampusAssignment>> {
        let assignment = sqlx::query_as::<_, MemberCampusAssignment>(
            r#"
            SELECT * FROM member_campus_assignments
            WHERE member_id = $1 AND campus_id = $2 AND status = 'active'
            "#,
        )
        .bind(member_id)
        .bind(campus_id)
        .fetch_optional(conn)
        .await?;

        Ok(assignment)
    }

    /// Clear the primary flag on all of the member's other active
    /// assignments in the organization. Returns the number of rows touched.
    pub async fn clear_primary(
        &self,
        conn: &mut PgConnection,
        member_id: Uuid,
        organization_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE member_campus_assignments
            SET is_primary = false, updated_at = NOW()
            WHERE member_id = $1 AND organization_id = $2
              AND status = 'active' AND is_primary = true
            "#,
        )
        .bind(member_id)
        .bind(organization_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert a new assignment row. A concurrent duplicate is caught by the
    /// partial unique indexes and surfaces as `DuplicateEntry`.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        new: &NewAssignment,
    ) -> Result<MemberCampusAssignment> {
        let assignment = sqlx::query_as::<_, MemberCampusAssignment>(
            r#"
            INSERT INTO member_campus_assignments
                (member_id, campus_id, organization_id, is_primary, status,
                 note, assigned_by, transferred_from_campus_id)
            VALUES ($1, $2, $3, $4, 'active', $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.member_id)
        .bind(new.campus_id)
        .bind(new.organization_id)
        .bind(new.is_primary)
        .bind(&new.note)
        .bind(new.assigned_by)
        .bind(new.transferred_from_campus_id)
        .fetch_one(conn)
        .await?;

        Ok(assignment)
    }

    /// Move an assignment out of the active state. Used by the transfer
    /// orchestrator; not exposed as an ad-hoc status update.
    pub async fn set_status(
        &self,
        conn: &mut PgConnection,
        assignment_id: Uuid,
        status: AssignmentStatus,
    ) -> Result<MemberCampusAssignment> {
        let assignment = sqlx::query_as::<_, MemberCampusAssignment>(
            r#"
            UPDATE member_campus_assignments
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(assignment_id)
        .bind(status)
        .fetch_one(conn)
        .await?;

        Ok(assignment)
    }
}
