use crate::error::{DatabaseError, Result};
use campus_models::Campus;
use sqlx::PgPool;
use uuid::Uuid;

/// Read-only lookup into the campus directory.
#[derive(Clone)]
pub struct CampusRepository {
    pool: PgPool,
}

impl CampusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a campus by id, verifying it belongs to the organization.
    pub async fn find_in_organization(
        &self,
        organization_id: Uuid,
        campus_id: Uuid,
    ) -> Result<Campus> {
        let campus = sqlx::query_as::<_, Campus>(
            "SELECT * FROM campuses WHERE id = $1 AND organization_id = $2",
        )
        .bind(campus_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Campus", &campus_id.to_string()))?;

        Ok(campus)
    }

    /// List all campuses of an organization.
    pub async fn list_by_organization(&self, organization_id: Uuid) -> Result<Vec<Campus>> {
        let campuses = sqlx::query_as::<_, Campus>(
            "SELECT * FROM campuses WHERE organization_id = $1 ORDER BY name",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(campuses)
    }
}
