pub mod assignments;
pub mod campus_roles;
pub mod campuses;
pub mod members;
pub mod transfer_history;
