// Core modules
pub mod assignment;
pub mod campus;
pub mod campus_role;
pub mod member;
pub mod transfer;

// Analytics rollups
pub mod analytics;

// Re-export commonly used types
pub use assignment::{
    AssignMemberRequest, AssignmentStatus, AssignmentWithCampus, MemberCampusAssignment,
    NewAssignment,
};
pub use campus::Campus;
pub use campus_role::{CampusMemberRole, GrantRoleRequest, NewRoleGrant};
pub use member::Member;
pub use transfer::{
    snapshot_roles, validate_role_snapshot, MemberTransferHistory, NewTransferRecord,
    RoleSnapshotEntry, TransferHistoryQuery, TransferRequest, TransferResult, TransferStatus,
    TransferType,
};
pub use analytics::CampusStat;
