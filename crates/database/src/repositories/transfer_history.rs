use crate::error::{DatabaseError, Result};
use campus_models::{validate_role_snapshot, MemberTransferHistory, NewTransferRecord};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const DEFAULT_QUERY_LIMIT: i64 = 50;
const MAX_QUERY_LIMIT: i64 = 500;

/// Append-only ledger of completed transfers.
///
/// The storage layer enforces immutability (a trigger rejects UPDATE and
/// DELETE on the table); this repository only ever inserts and selects.
#[derive(Clone)]
pub struct TransferHistoryRepository {
    pool: PgPool,
}

impl TransferHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one ledger entry. Rejects malformed role snapshots before
    /// touching the table.
    pub async fn record(
        &self,
        conn: &mut PgConnection,
        new: &NewTransferRecord,
    ) -> Result<MemberTransferHistory> {
        validate_role_snapshot(&new.role_snapshot)
            .map_err(|reason| DatabaseError::InvalidInput(format!("role snapshot: {}", reason)))?;

        let record = sqlx::query_as::<_, MemberTransferHistory>(
            r#"
            INSERT INTO member_transfer_history
                (member_id, from_campus_id, to_campus_id, organization_id,
                 reason, transfer_type, requested_by, approved_by,
                 role_snapshot, note, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new.member_id)
        .bind(new.from_campus_id)
        .bind(new.to_campus_id)
        .bind(new.organization_id)
        .bind(&new.reason)
        .bind(new.transfer_type)
        .bind(new.requested_by)
        .bind(new.approved_by)
        .bind(&new.role_snapshot)
        .bind(&new.note)
        .bind(new.status)
        .fetch_one(conn)
        .await?;

        Ok(record)
    }

    /// Query ledger entries for an organization, most recent first.
    pub async fn query(
        &self,
        organization_id: Uuid,
        member_id: Option<Uuid>,
        limit: Option<i64>,
    ) -> Result<Vec<MemberTransferHistory>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT * FROM member_transfer_history WHERE organization_id = ",
        );
        builder.push_bind(organization_id);

        if let Some(member_id) = member_id {
            builder.push(" AND member_id = ");
            builder.push_bind(member_id);
        }

        builder.push(" ORDER BY transferred_at DESC");

        let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).clamp(1, MAX_QUERY_LIMIT);
        builder.push(" LIMIT ");
        builder.push_bind(limit);

        let records = builder
            .build_query_as::<MemberTransferHistory>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }
}
