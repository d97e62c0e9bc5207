use crate::error::Result;
use campus_database::{CampusRepository, Database};
use campus_models::CampusStat;
use uuid::Uuid;

/// Read-only membership rollups computed from the assignment store.
pub struct AnalyticsService {
    db: Database,
    campuses: CampusRepository,
}

impl AnalyticsService {
    pub fn new(db: Database) -> Self {
        let pool = db.pool().clone();

        Self {
            db,
            campuses: CampusRepository::new(pool),
        }
    }

    /// Per-campus counts for an organization, optionally narrowed to one
    /// campus. Transferred assignments are excluded from every total; they
    /// remain reachable through the transfer ledger.
    pub async fn campus_stats(
        &self,
        organization_id: Uuid,
        campus_id: Option<Uuid>,
    ) -> Result<Vec<CampusStat>> {
        if let Some(campus_id) = campus_id {
            self.campuses
                .find_in_organization(organization_id, campus_id)
                .await?;
        }

        let stats = sqlx::query_as::<_, CampusStat>(
            r#"
            SELECT
                c.id AS campus_id,
                c.name AS campus_name,
                COUNT(a.id) FILTER (WHERE a.status <> 'transferred') AS total_members,
                COUNT(a.id) FILTER (WHERE a.status = 'active') AS active_members,
                COUNT(a.id) FILTER (WHERE a.status = 'inactive') AS inactive_members,
                COUNT(a.id) FILTER (WHERE a.status = 'active' AND a.is_primary) AS primary_members,
                COUNT(a.id) FILTER (
                    WHERE a.status = 'active' AND a.assigned_at >= NOW() - INTERVAL '30 days'
                ) AS recent_joins
            FROM campuses c
            LEFT JOIN member_campus_assignments a ON a.campus_id = c.id
            WHERE c.organization_id = $1 AND ($2::uuid IS NULL OR c.id = $2)
            GROUP BY c.id, c.name
            ORDER BY c.name
            "#,
        )
        .bind(organization_id)
        .bind(campus_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(campus_database::DatabaseError::from)?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment_service::AssignmentService;
    use crate::transfer_service::TransferService;
    use campus_database::DatabaseConfig;
    use campus_models::{AssignMemberRequest, TransferRequest, TransferType};

    #[tokio::test]
    #[ignore] // Only run with database available
    async fn test_transferred_members_leave_the_totals() {
        let db = Database::new(DatabaseConfig::from_env())
            .await
            .expect("Failed to connect to database");

        let org = Uuid::new_v4();
        let campus_a: (Uuid,) =
            sqlx::query_as("INSERT INTO campuses (organization_id, name) VALUES ($1, 'Stats A') RETURNING id")
                .bind(org)
                .fetch_one(db.pool())
                .await
                .unwrap();
        let campus_b: (Uuid,) =
            sqlx::query_as("INSERT INTO campuses (organization_id, name) VALUES ($1, 'Stats B') RETURNING id")
                .bind(org)
                .fetch_one(db.pool())
                .await
                .unwrap();
        let member: (Uuid,) = sqlx::query_as(
            "INSERT INTO members (display_name, email) VALUES ('Stats Member', $1) RETURNING id",
        )
        .bind(format!("{}@example.test", Uuid::new_v4()))
        .fetch_one(db.pool())
        .await
        .unwrap();

        AssignmentService::new(db.clone())
            .assign(
                org,
                campus_a.0,
                AssignMemberRequest {
                    member_id: member.0,
                    is_primary: true,
                    note: None,
                },
                None,
            )
            .await
            .unwrap();

        let service = AnalyticsService::new(db.clone());
        let stats = service.campus_stats(org, Some(campus_a.0)).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].active_members, 1);
        assert_eq!(stats[0].primary_members, 1);
        assert_eq!(stats[0].recent_joins, 1);

        TransferService::new(db.clone())
            .transfer(
                org,
                member.0,
                TransferRequest {
                    from_campus_id: campus_a.0,
                    to_campus_id: campus_b.0,
                    reason: None,
                    note: None,
                    transfer_type: TransferType::Manual,
                    approved_by: None,
                },
                None,
            )
            .await
            .unwrap();

        // The transferred row at A no longer counts anywhere; B picks the
        // member up as active and primary.
        let stats = service.campus_stats(org, None).await.unwrap();
        let at_a = stats.iter().find(|s| s.campus_id == campus_a.0).unwrap();
        assert_eq!(at_a.total_members, 0);
        assert_eq!(at_a.active_members, 0);

        let at_b = stats.iter().find(|s| s.campus_id == campus_b.0).unwrap();
        assert_eq!(at_b.active_members, 1);
        assert_eq!(at_b.primary_members, 1);
    }
}
