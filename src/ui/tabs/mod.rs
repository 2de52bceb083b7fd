pub mod dashboard;
pub mod inventory;
pub mod shipments;
pub mod users;
