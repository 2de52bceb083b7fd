//! Data models for the warehouse API.
//!
//! This module contains the structures used to represent backend data:
//!
//! - `InventoryItem`: stocked items with quantity and minimum-stock levels
//! - `Shipment`, `ShipmentItem`: incoming/outgoing shipments and their lines
//! - `ShipmentType`, `ShipmentStatus`: wire enums plus the transition rules
//! - `User`: accounts, including the admin-only listing
//! - `DashboardData`: aggregate statistics for the dashboard tab

pub mod dashboard;
pub mod inventory;
pub mod shipment;
pub mod user;

pub use dashboard::{DashboardData, ShipmentActivity, TopItem};
pub use inventory::{InventoryItem, InventorySortColumn, NewInventoryItem};
pub use shipment::{
    NewShipment, NewShipmentItem, Shipment, ShipmentItem, ShipmentStatus, ShipmentType,
};
pub use user::{NewUser, User};
