pub mod analytics_service;
pub mod assignment_service;
pub mod error;
pub mod role_service;
pub mod transfer_service;

pub use analytics_service::AnalyticsService;
pub use assignment_service::AssignmentService;
pub use error::{CampusError, Result};
pub use role_service::RoleService;
pub use transfer_service::TransferService;
