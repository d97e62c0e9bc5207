pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::{Database, DatabaseConfig};
pub use error::{DatabaseError, Result};
pub use repositories::{
    assignments::AssignmentRepository,
    campus_roles::CampusRoleRepository,
    campuses::CampusRepository,
    members::MemberRepository,
    transfer_history::TransferHistoryRepository,
};
