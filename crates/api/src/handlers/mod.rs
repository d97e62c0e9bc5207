pub mod analytics;
pub mod assignments;
pub mod campuses;
pub mod health;
pub mod roles;
pub mod transfers;

use axum::{http::StatusCode, Json};
use campus_core::CampusError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

/// Map a core error onto a status code and wire error code.
///
/// Conflict responses keep the ids in the message so callers can decide
/// whether to retry (`concurrency_conflict` only) or surface the failure.
pub fn map_campus_error(err: CampusError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        CampusError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        CampusError::NoOpTransfer { .. } => (StatusCode::BAD_REQUEST, "no_op_transfer"),
        CampusError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        CampusError::SourceAssignmentNotFound { .. } => {
            (StatusCode::NOT_FOUND, "source_assignment_not_found")
        }
        CampusError::DuplicateAssignment { .. } => (StatusCode::CONFLICT, "duplicate_assignment"),
        CampusError::DestinationAlreadyAssigned { .. } => {
            (StatusCode::CONFLICT, "destination_already_assigned")
        }
        CampusError::ConcurrencyConflict { .. } => (StatusCode::CONFLICT, "concurrency_conflict"),
        CampusError::InvalidSnapshot(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_snapshot"),
        CampusError::Database(_) | CampusError::Internal(_) => {
            tracing::error!("Internal error: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", "Internal server error")),
            );
        }
    };

    (status, Json(ErrorResponse::new(code, &err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_status_mapping() {
        let member_id = Uuid::new_v4();
        let campus_id = Uuid::new_v4();

        let (status, _) = map_campus_error(CampusError::NoOpTransfer { campus_id });
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = map_campus_error(CampusError::SourceAssignmentNotFound {
            member_id,
            campus_id,
        });
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = map_campus_error(CampusError::DestinationAlreadyAssigned {
            member_id,
            campus_id,
        });
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = map_campus_error(CampusError::ConcurrencyConflict { member_id });
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) =
            map_campus_error(CampusError::InvalidSnapshot("not an array".to_string()));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // Internal detail never leaks to the caller.
        let (status, body) =
            map_campus_error(CampusError::Internal("pool exhausted at 10.0.0.5".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Internal server error");
    }
}
