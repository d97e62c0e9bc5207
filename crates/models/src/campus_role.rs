use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

lazy_static! {
    // Capability tags are dotted lowercase paths, e.g. "serve.usher" or "admin.schedule.edit"
    static ref PERMISSION_TAG: Regex = Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*$").unwrap();
}

/// A campus-scoped role grant held by a member, time-bounded by start/end dates.
///
/// Permissions are an ordered list of capability tags rather than a fixed
/// enum; interpreting them is the external authorization layer's job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampusMemberRole {
    pub id: Uuid,
    pub member_id: Uuid,
    pub campus_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub assigned_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request to grant a campus-scoped role to a member
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GrantRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(custom(function = validate_permission_tags))]
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Insert payload used by the role repository.
#[derive(Debug, Clone)]
pub struct NewRoleGrant {
    pub member_id: Uuid,
    pub campus_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub assigned_by: Option<Uuid>,
}

pub fn validate_permission_tags(permissions: &[String]) -> Result<(), ValidationError> {
    for tag in permissions {
        if !PERMISSION_TAG.is_match(tag) {
            return Err(ValidationError::new("invalid_permission_tag"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_tag_format() {
        assert!(validate_permission_tags(&["serve.usher".to_string()]).is_ok());
        assert!(validate_permission_tags(&["admin.schedule.edit".to_string()]).is_ok());
        assert!(validate_permission_tags(&["teach_youth".to_string()]).is_ok());

        assert!(validate_permission_tags(&["Serve.Usher".to_string()]).is_err());
        assert!(validate_permission_tags(&["bad tag".to_string()]).is_err());
        assert!(validate_permission_tags(&[".leading.dot".to_string()]).is_err());
        assert!(validate_permission_tags(&["".to_string()]).is_err());
    }

    #[test]
    fn test_grant_request_validation() {
        let request = GrantRoleRequest {
            title: "Usher".to_string(),
            description: None,
            permissions: vec!["serve.usher".to_string(), "serve.greeter".to_string()],
        };
        assert!(request.validate().is_ok());

        let request = GrantRoleRequest {
            title: "".to_string(),
            ..request
        };
        assert!(request.validate().is_err());
    }
}
