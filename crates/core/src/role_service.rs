use crate::error::{CampusError, Result};
use campus_database::{
    AssignmentRepository, CampusRoleRepository, CampusRepository, Database, DatabaseError,
};
use campus_models::{CampusMemberRole, GrantRoleRequest, NewRoleGrant};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

/// Role store operations: granting, listing, and closing campus-scoped
/// role grants.
pub struct RoleService {
    db: Database,
    roles: CampusRoleRepository,
    assignments: AssignmentRepository,
    campuses: CampusRepository,
}

impl RoleService {
    pub fn new(db: Database) -> Self {
        let pool = db.pool().clone();

        Self {
            db,
            roles: CampusRoleRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool.clone()),
            campuses: CampusRepository::new(pool),
        }
    }

    /// Grant a campus-scoped role to a member.
    ///
    /// An active role grant only makes sense for a member who is actively
    /// assigned at that campus, so the assignment row is locked while the
    /// grant is inserted; a transfer in flight for the member blocks us out.
    pub async fn grant(
        &self,
        organization_id: Uuid,
        campus_id: Uuid,
        member_id: Uuid,
        request: GrantRoleRequest,
        actor: Option<Uuid>,
    ) -> Result<CampusMemberRole> {
        request.validate()?;

        self.campuses
            .find_in_organization(organization_id, campus_id)
            .await?;

        let mut tx = self.db.pool().begin().await.map_err(DatabaseError::from)?;

        let locked = self
            .assignments
            .lock_member_assignments(&mut *tx, member_id, organization_id)
            .await
            .map_err(|e| match e {
                DatabaseError::LockNotAvailable(_) => {
                    CampusError::ConcurrencyConflict { member_id }
                }
                other => other.into(),
            })?;

        if !locked.iter().any(|a| a.campus_id == campus_id) {
            return Err(CampusError::NotFound(format!(
                "Member {} has no active assignment at campus {}",
                member_id, campus_id
            )));
        }

        let new = NewRoleGrant {
            member_id,
            campus_id,
            title: request.title,
            description: request.description,
            permissions: request.permissions,
            assigned_by: actor,
        };

        let role = self.roles.insert(&mut *tx, &new).await?;

        tx.commit().await.map_err(DatabaseError::from)?;

        tracing::info!(
            member_id = %member_id,
            campus_id = %campus_id,
            title = %role.title,
            "role granted"
        );

        Ok(role)
    }

    /// List a member's active role grants, optionally narrowed to one campus.
    pub async fn list_active(
        &self,
        member_id: Uuid,
        campus_id: Option<Uuid>,
    ) -> Result<Vec<CampusMemberRole>> {
        Ok(self.roles.list_active(member_id, campus_id).await?)
    }

    /// Close all active role grants for a (member, campus) pair.
    ///
    /// Idempotent: a second call with no intervening grant closes nothing
    /// and returns an empty set.
    pub async fn close_roles(
        &self,
        campus_id: Uuid,
        member_id: Uuid,
    ) -> Result<Vec<CampusMemberRole>> {
        let mut conn = self.db.pool().acquire().await.map_err(DatabaseError::from)?;

        let closed = self
            .roles
            .close_roles(&mut *conn, member_id, campus_id, Utc::now())
            .await?;

        if !closed.is_empty() {
            tracing::info!(
                member_id = %member_id,
                campus_id = %campus_id,
                closed = closed.len(),
                "role grants closed"
            );
        }

        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment_service::AssignmentService;
    use campus_database::DatabaseConfig;
    use campus_models::AssignMemberRequest;

    async fn test_db() -> Database {
        Database::new(DatabaseConfig::from_env())
            .await
            .expect("Failed to connect to database")
    }

    async fn seed_assigned_member(db: &Database) -> (Uuid, Uuid, Uuid) {
        let org_id = Uuid::new_v4();
        let campus: (Uuid,) =
            sqlx::query_as("INSERT INTO campuses (organization_id, name) VALUES ($1, 'Campus A') RETURNING id")
                .bind(org_id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        let member: (Uuid,) = sqlx::query_as(
            "INSERT INTO members (display_name, email) VALUES ('Role Member', $1) RETURNING id",
        )
        .bind(format!("{}@example.test", Uuid::new_v4()))
        .fetch_one(db.pool())
        .await
        .unwrap();

        AssignmentService::new(db.clone())
            .assign(
                org_id,
                campus.0,
                AssignMemberRequest {
                    member_id: member.0,
                    is_primary: true,
                    note: None,
                },
                None,
            )
            .await
            .unwrap();

        (org_id, campus.0, member.0)
    }

    fn usher_request() -> GrantRoleRequest {
        GrantRoleRequest {
            title: "Usher".to_string(),
            description: None,
            permissions: vec!["serve.usher".to_string()],
        }
    }

    #[tokio::test]
    #[ignore] // Only run with database available
    async fn test_grant_requires_active_assignment() {
        let db = test_db().await;
        let (org, campus, _member) = seed_assigned_member(&db).await;
        let service = RoleService::new(db);

        let stranger = Uuid::new_v4();
        let err = service
            .grant(org, campus, stranger, usher_request(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CampusError::NotFound(_)));
    }

    #[tokio::test]
    #[ignore] // Only run with database available
    async fn test_close_roles_is_idempotent() {
        let db = test_db().await;
        let (org, campus, member) = seed_assigned_member(&db).await;
        let service = RoleService::new(db);

        service
            .grant(org, campus, member, usher_request(), None)
            .await
            .unwrap();

        let closed = service.close_roles(campus, member).await.unwrap();
        assert_eq!(closed.len(), 1);
        assert!(!closed[0].is_active);
        assert!(closed[0].end_date.is_some());

        // Second close with no intervening grant: empty, not an error.
        let closed_again = service.close_roles(campus, member).await.unwrap();
        assert!(closed_again.is_empty());

        assert!(service
            .list_active(member, Some(campus))
            .await
            .unwrap()
            .is_empty());
    }
}
