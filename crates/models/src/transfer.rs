use crate::campus_role::CampusMemberRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// How a transfer was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transfer_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    Manual,
    Automatic,
    Bulk,
}

impl Default for TransferType {
    fn default() -> Self {
        Self::Manual
    }
}

/// Outcome recorded on a ledger entry. Completed entries are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transfer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Completed,
    Failed,
    Pending,
}

/// One append-only ledger entry describing a completed transfer.
///
/// `role_snapshot` is an immutable copy of the role grants that were active
/// at the source campus when the transfer ran, not a live reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberTransferHistory {
    pub id: Uuid,
    pub member_id: Uuid,
    pub from_campus_id: Uuid,
    pub to_campus_id: Uuid,
    pub organization_id: Uuid,
    pub reason: Option<String>,
    pub transfer_type: TransferType,
    pub requested_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub role_snapshot: serde_json::Value,
    pub note: Option<String>,
    pub status: TransferStatus,
    pub transferred_at: DateTime<Utc>,
}

/// One entry of a role snapshot as persisted in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSnapshotEntry {
    pub role_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl From<&CampusMemberRole> for RoleSnapshotEntry {
    fn from(role: &CampusMemberRole) -> Self {
        Self {
            role_id: role.id,
            title: role.title.clone(),
            description: role.description.clone(),
            permissions: role.permissions.clone(),
            start_date: role.start_date,
            end_date: role.end_date,
        }
    }
}

/// Freeze the given role grants into the JSON form stored on a ledger entry.
pub fn snapshot_roles(roles: &[CampusMemberRole]) -> serde_json::Value {
    let entries: Vec<RoleSnapshotEntry> = roles.iter().map(RoleSnapshotEntry::from).collect();
    serde_json::to_value(entries).unwrap_or_else(|_| serde_json::Value::Array(vec![]))
}

/// Check that a snapshot value has the shape the ledger expects: a JSON
/// array of objects each carrying `role_id`, `title`, and a string-array
/// `permissions` field.
pub fn validate_role_snapshot(snapshot: &serde_json::Value) -> Result<(), String> {
    let entries = snapshot
        .as_array()
        .ok_or_else(|| "role snapshot must be a JSON array".to_string())?;

    for (i, entry) in entries.iter().enumerate() {
        let obj = entry
            .as_object()
            .ok_or_else(|| format!("snapshot entry {} is not an object", i))?;

        let role_id = obj
            .get("role_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| format!("snapshot entry {} is missing role_id", i))?;
        if Uuid::parse_str(role_id).is_err() {
            return Err(format!("snapshot entry {} has a malformed role_id", i));
        }

        if obj.get("title").and_then(|v| v.as_str()).is_none() {
            return Err(format!("snapshot entry {} is missing title", i));
        }

        let permissions = obj
            .get("permissions")
            .and_then(|v| v.as_array())
            .ok_or_else(|| format!("snapshot entry {} is missing permissions", i))?;
        if permissions.iter().any(|p| !p.is_string()) {
            return Err(format!("snapshot entry {} has non-string permissions", i));
        }
    }

    Ok(())
}

/// Request to transfer a member between two campuses of an organization
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransferRequest {
    pub from_campus_id: Uuid,
    pub to_campus_id: Uuid,

    #[validate(length(max = 500))]
    pub reason: Option<String>,

    #[validate(length(max = 500))]
    pub note: Option<String>,

    #[serde(default)]
    pub transfer_type: TransferType,

    pub approved_by: Option<Uuid>,
}

/// Result of a committed transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResult {
    pub new_assignment_id: Uuid,
    pub history_record_id: Uuid,
    pub closed_role_count: usize,
}

/// Insert payload used by the transfer ledger repository.
#[derive(Debug, Clone)]
pub struct NewTransferRecord {
    pub member_id: Uuid,
    pub from_campus_id: Uuid,
    pub to_campus_id: Uuid,
    pub organization_id: Uuid,
    pub reason: Option<String>,
    pub transfer_type: TransferType,
    pub requested_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub role_snapshot: serde_json::Value,
    pub note: Option<String>,
    pub status: TransferStatus,
}

/// Ledger query filters, newest entries first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransferHistoryQuery {
    pub member_id: Option<Uuid>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_role() -> CampusMemberRole {
        CampusMemberRole {
            id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            campus_id: Uuid::new_v4(),
            title: "Usher".to_string(),
            description: Some("Sunday service usher".to_string()),
            permissions: vec!["serve.usher".to_string()],
            start_date: Utc::now(),
            end_date: None,
            is_active: true,
            assigned_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_of_active_roles_is_valid() {
        let roles = vec![sample_role(), sample_role()];
        let snapshot = snapshot_roles(&roles);

        assert!(validate_role_snapshot(&snapshot).is_ok());

        let entries: Vec<RoleSnapshotEntry> = serde_json::from_value(snapshot).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Usher");
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        let snapshot = snapshot_roles(&[]);
        assert!(validate_role_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn test_malformed_snapshots_are_rejected() {
        // Not an array
        assert!(validate_role_snapshot(&serde_json::json!({"title": "Usher"})).is_err());

        // Entry missing role_id
        let snapshot = serde_json::json!([{"title": "Usher", "permissions": []}]);
        assert!(validate_role_snapshot(&snapshot).is_err());

        // role_id not a UUID
        let snapshot = serde_json::json!([
            {"role_id": "not-a-uuid", "title": "Usher", "permissions": []}
        ]);
        assert!(validate_role_snapshot(&snapshot).is_err());

        // Non-string permission tags
        let snapshot = serde_json::json!([
            {"role_id": Uuid::new_v4().to_string(), "title": "Usher", "permissions": [1, 2]}
        ]);
        assert!(validate_role_snapshot(&snapshot).is_err());
    }

    #[test]
    fn test_transfer_type_defaults_to_manual() {
        let request: TransferRequest = serde_json::from_value(serde_json::json!({
            "from_campus_id": Uuid::new_v4(),
            "to_campus_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(request.transfer_type, TransferType::Manual);
    }
}
