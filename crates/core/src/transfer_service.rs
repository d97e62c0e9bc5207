use crate::error::{CampusError, Result};
use campus_database::{
    AssignmentRepository, CampusRoleRepository, CampusRepository, Database, DatabaseError,
    MemberRepository, TransferHistoryRepository,
};
use campus_models::{
    snapshot_roles, AssignmentStatus, MemberTransferHistory, NewAssignment, NewTransferRecord,
    TransferHistoryQuery, TransferRequest, TransferResult, TransferStatus,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

/// The transfer orchestrator: the only component that writes across the
/// assignment store, role store, and transfer ledger in one unit.
///
/// A transfer attempt moves `Requested → Validated → Applied → Recorded`
/// inside a single transaction holding row locks on the member's active
/// assignments; any failure after validation rolls the whole unit back and
/// leaves no ledger entry.
pub struct TransferService {
    db: Database,
    assignments: AssignmentRepository,
    roles: CampusRoleRepository,
    history: TransferHistoryRepository,
    campuses: CampusRepository,
    members: MemberRepository,
}

impl TransferService {
    pub fn new(db: Database) -> Self {
        let pool = db.pool().clone();

        Self {
            db,
            assignments: AssignmentRepository::new(pool.clone()),
            roles: CampusRoleRepository::new(pool.clone()),
            history: TransferHistoryRepository::new(pool.clone()),
            campuses: CampusRepository::new(pool.clone()),
            members: MemberRepository::new(pool),
        }
    }

    /// Move a member's active assignment from one campus to another.
    ///
    /// The destination assignment carries the source's primary flag. Role
    /// grants at the source are closed, never copied: responsibilities do
    /// not follow a member across campuses. The pre-close grants are frozen
    /// into the ledger entry. Assignments the member holds at other
    /// campuses are left untouched.
    pub async fn transfer(
        &self,
        organization_id: Uuid,
        member_id: Uuid,
        request: TransferRequest,
        requested_by: Option<Uuid>,
    ) -> Result<TransferResult> {
        request.validate()?;
        validate_campus_pair(request.from_campus_id, request.to_campus_id)?;

        let member = self.members.find_by_id(member_id).await?;
        self.campuses
            .find_in_organization(organization_id, request.from_campus_id)
            .await?;
        self.campuses
            .find_in_organization(organization_id, request.to_campus_id)
            .await?;

        let mut tx = self.db.pool().begin().await.map_err(DatabaseError::from)?;

        // Per-member mutual exclusion for the whole unit. NOWAIT bounds the
        // wait: a competing transfer or assign holding the lock surfaces as
        // ConcurrencyConflict instead of a stall.
        let active = self
            .assignments
            .lock_member_assignments(&mut *tx, member.id, organization_id)
            .await
            .map_err(|e| match e {
                DatabaseError::LockNotAvailable(_) => CampusError::ConcurrencyConflict {
                    member_id: member.id,
                },
                other => other.into(),
            })?;

        let source = active
            .iter()
            .find(|a| a.campus_id == request.from_campus_id)
            .ok_or(CampusError::SourceAssignmentNotFound {
                member_id: member.id,
                campus_id: request.from_campus_id,
            })?
            .clone();

        if active.iter().any(|a| a.campus_id == request.to_campus_id) {
            return Err(CampusError::DestinationAlreadyAssigned {
                member_id: member.id,
                campus_id: request.to_campus_id,
            });
        }

        // Freeze the source roles before anything mutates.
        let source_roles = self
            .roles
            .lock_active(&mut *tx, member.id, request.from_campus_id)
            .await
            .map_err(|e| match e {
                DatabaseError::LockNotAvailable(_) => CampusError::ConcurrencyConflict {
                    member_id: member.id,
                },
                other => other.into(),
            })?;
        let role_snapshot = snapshot_roles(&source_roles);

        self.assignments
            .set_status(&mut *tx, source.id, AssignmentStatus::Transferred)
            .await?;

        let closed = self
            .roles
            .close_roles(&mut *tx, member.id, request.from_campus_id, Utc::now())
            .await?;

        let destination = self
            .assignments
            .insert(
                &mut *tx,
                &NewAssignment {
                    member_id: member.id,
                    campus_id: request.to_campus_id,
                    organization_id,
                    is_primary: source.is_primary,
                    note: request.note.clone(),
                    assigned_by: requested_by,
                    transferred_from_campus_id: Some(request.from_campus_id),
                },
            )
            .await?;

        let record = self
            .history
            .record(
                &mut *tx,
                &NewTransferRecord {
                    member_id: member.id,
                    from_campus_id: request.from_campus_id,
                    to_campus_id: request.to_campus_id,
                    organization_id,
                    reason: request.reason,
                    transfer_type: request.transfer_type,
                    requested_by,
                    approved_by: request.approved_by,
                    role_snapshot,
                    note: request.note,
                    status: TransferStatus::Completed,
                },
            )
            .await
            .map_err(|e| match e {
                DatabaseError::InvalidInput(reason) => CampusError::InvalidSnapshot(reason),
                other => other.into(),
            })?;

        // Commit or nothing: a failure anywhere above drops the transaction
        // and the ledger never sees the attempt.
        tx.commit().await.map_err(DatabaseError::from)?;

        tracing::info!(
            member_id = %member.id,
            from_campus_id = %request.from_campus_id,
            to_campus_id = %request.to_campus_id,
            closed_roles = closed.len(),
            history_id = %record.id,
            "member transferred"
        );

        Ok(TransferResult {
            new_assignment_id: destination.id,
            history_record_id: record.id,
            closed_role_count: closed.len(),
        })
    }

    /// Query the transfer ledger for an organization, newest first.
    pub async fn history(
        &self,
        organization_id: Uuid,
        query: TransferHistoryQuery,
    ) -> Result<Vec<MemberTransferHistory>> {
        Ok(self
            .history
            .query(organization_id, query.member_id, query.limit)
            .await?)
    }
}

/// A transfer within a single campus is meaningless; reject it before any
/// lookup or lock is taken.
fn validate_campus_pair(from_campus_id: Uuid, to_campus_id: Uuid) -> Result<()> {
    if from_campus_id == to_campus_id {
        return Err(CampusError::NoOpTransfer {
            campus_id: from_campus_id,
        });
    }
    Ok(())
}
