use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, CampusError>;

/// Caller-facing error taxonomy for assignment and transfer operations.
///
/// Every variant is recoverable: operations either commit or report why they
/// did not. Only `ConcurrencyConflict` is safe to retry unchanged; the rest
/// indicate a logical precondition violation.
#[derive(Debug, Error)]
pub enum CampusError {
    #[error("Member {member_id} already has an active assignment at campus {campus_id}")]
    DuplicateAssignment { member_id: Uuid, campus_id: Uuid },

    #[error("Member {member_id} has no active assignment at campus {campus_id}")]
    SourceAssignmentNotFound { member_id: Uuid, campus_id: Uuid },

    #[error("Member {member_id} already has an active assignment at destination campus {campus_id}")]
    DestinationAlreadyAssigned { member_id: Uuid, campus_id: Uuid },

    #[error("Transfer source and destination are the same campus ({campus_id})")]
    NoOpTransfer { campus_id: Uuid },

    #[error("Invalid role snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Another operation is in flight for member {member_id}; retry with backoff")]
    ConcurrencyConflict { member_id: Uuid },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(campus_database::DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<campus_database::DatabaseError> for CampusError {
    fn from(err: campus_database::DatabaseError) -> Self {
        match err {
            campus_database::DatabaseError::NotFound(msg) => CampusError::NotFound(msg),
            other => CampusError::Database(other),
        }
    }
}

impl From<validator::ValidationErrors> for CampusError {
    fn from(err: validator::ValidationErrors) -> Self {
        CampusError::ValidationError(err.to_string())
    }
}

impl From<sqlx::Error> for CampusError {
    fn from(err: sqlx::Error) -> Self {
        CampusError::Internal(err.to_string())
    }
}
