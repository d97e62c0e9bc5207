use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a member-campus assignment.
///
/// `Transferred` is terminal and is only ever written by the transfer
/// orchestrator; `Inactive` covers explicit deactivation outside a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "assignment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Inactive,
    Transferred,
}

/// A member's assignment to one campus within an organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberCampusAssignment {
    pub id: Uuid,
    pub member_id: Uuid,
    pub campus_id: Uuid,
    pub organization_id: Uuid,
    pub is_primary: bool,
    pub status: AssignmentStatus,
    pub assigned_at: DateTime<Utc>,
    pub note: Option<String>,
    pub assigned_by: Option<Uuid>,
    pub transferred_from_campus_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Assignment joined with the campus name, for member-facing listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignmentWithCampus {
    pub id: Uuid,
    pub member_id: Uuid,
    pub campus_id: Uuid,
    pub organization_id: Uuid,
    pub is_primary: bool,
    pub status: AssignmentStatus,
    pub assigned_at: DateTime<Utc>,
    pub note: Option<String>,
    pub assigned_by: Option<Uuid>,
    pub transferred_from_campus_id: Option<Uuid>,

    // Campus details
    pub campus_name: String,
}

/// Request to assign a member to a campus
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignMemberRequest {
    pub member_id: Uuid,

    #[serde(default)]
    pub is_primary: bool,

    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Insert payload used by the assignment repository.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub member_id: Uuid,
    pub campus_id: Uuid,
    pub organization_id: Uuid,
    pub is_primary: bool,
    pub note: Option<String>,
    pub assigned_by: Option<Uuid>,
    pub transferred_from_campus_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_roundtrip() {
        let json = serde_json::to_string(&AssignmentStatus::Transferred).unwrap();
        assert_eq!(json, "\"transferred\"");

        let status: AssignmentStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, AssignmentStatus::Active);
    }

    #[test]
    fn test_assign_request_note_too_long() {
        let request = AssignMemberRequest {
            member_id: Uuid::new_v4(),
            is_primary: false,
            note: Some("x".repeat(501)),
        };
        assert!(request.validate().is_err());

        let request = AssignMemberRequest {
            note: Some("welcome note".to_string()),
            ..request
        };
        assert!(request.validate().is_ok());
    }
}
