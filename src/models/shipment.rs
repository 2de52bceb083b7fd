//! Shipment models and the status transition rules.
//!
//! The server owns enforcement: delivering a shipment recalculates inventory
//! quantities, and final states reject any further change. The client uses
//! the same transition table to decide which choices to offer before posting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Direction of a shipment, `IN` or `OUT` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentType {
    #[serde(rename = "IN")]
    Incoming,
    #[serde(rename = "OUT")]
    Outgoing,
}

impl ShipmentType {
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentType::Incoming => "Incoming",
            ShipmentType::Outgoing => "Outgoing",
        }
    }

    /// Wire value, also used as the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentType::Incoming => "IN",
            ShipmentType::Outgoing => "OUT",
        }
    }
}

/// Shipment lifecycle status. `Delivered` and `Cancelled` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl ShipmentStatus {
    /// Wire value, also used as the `status` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "PENDING",
            ShipmentStatus::InTransit => "IN_TRANSIT",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Display form: wire value with underscores replaced by spaces.
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "PENDING",
            ShipmentStatus::InTransit => "IN TRANSIT",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Final states can never be changed again.
    pub fn is_final(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered | ShipmentStatus::Cancelled)
    }

    /// Statuses this one may move to. Delivery from either non-final state
    /// triggers the server-side inventory recalculation.
    pub fn allowed_transitions(&self) -> &'static [ShipmentStatus] {
        match self {
            ShipmentStatus::Pending => &[
                ShipmentStatus::InTransit,
                ShipmentStatus::Delivered,
                ShipmentStatus::Cancelled,
            ],
            ShipmentStatus::InTransit => {
                &[ShipmentStatus::Delivered, ShipmentStatus::Cancelled]
            }
            ShipmentStatus::Delivered | ShipmentStatus::Cancelled => &[],
        }
    }

    /// Cycle used by the shipments tab status filter.
    pub const ALL: [ShipmentStatus; 4] = [
        ShipmentStatus::Pending,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
        ShipmentStatus::Cancelled,
    ];
}

/// One line of a shipment: an inventory item reference with quantity and
/// unit price. The backend serializes the price decimal as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub item: i64,
    pub quantity: i64,
    pub unit_price: String,
}

impl ShipmentItem {
    pub fn unit_price_value(&self) -> Option<f64> {
        self.unit_price.trim().parse().ok()
    }

    pub fn line_total(&self) -> Option<f64> {
        self.unit_price_value().map(|p| p * self.quantity as f64)
    }
}

/// A shipment as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: i64,
    #[serde(rename = "type")]
    pub shipment_type: ShipmentType,
    pub status: ShipmentStatus,
    pub tracking_number: String,
    pub carrier: String,
    #[serde(default)]
    pub estimated_arrival: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_arrival: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<ShipmentItem>,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(default)]
    pub updated_by: Option<User>,
}

impl Shipment {
    /// Total units across all lines.
    pub fn total_units(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Total value across all lines, skipping unparsable prices.
    pub fn total_value(&self) -> f64 {
        self.items.iter().filter_map(|i| i.line_total()).sum()
    }
}

/// Write shape for creating or replacing a shipment with nested lines.
#[derive(Debug, Clone, Serialize)]
pub struct NewShipment {
    #[serde(rename = "type")]
    pub shipment_type: ShipmentType,
    pub status: ShipmentStatus,
    pub tracking_number: String,
    pub carrier: String,
    pub estimated_arrival: DateTime<Utc>,
    pub items: Vec<NewShipmentItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewShipmentItem {
    pub item: i64,
    pub quantity: i64,
    pub unit_price: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_transitions() {
        assert_eq!(
            ShipmentStatus::Pending.allowed_transitions(),
            &[
                ShipmentStatus::InTransit,
                ShipmentStatus::Delivered,
                ShipmentStatus::Cancelled
            ]
        );
        assert_eq!(
            ShipmentStatus::InTransit.allowed_transitions(),
            &[ShipmentStatus::Delivered, ShipmentStatus::Cancelled]
        );
        assert!(ShipmentStatus::Delivered.allowed_transitions().is_empty());
        assert!(ShipmentStatus::Cancelled.allowed_transitions().is_empty());
    }

    #[test]
    fn test_status_finality() {
        assert!(!ShipmentStatus::Pending.is_final());
        assert!(!ShipmentStatus::InTransit.is_final());
        assert!(ShipmentStatus::Delivered.is_final());
        assert!(ShipmentStatus::Cancelled.is_final());
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&ShipmentStatus::InTransit).unwrap(),
            "\"IN_TRANSIT\""
        );
        let status: ShipmentStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, ShipmentStatus::Cancelled);
        assert_eq!(ShipmentStatus::InTransit.label(), "IN TRANSIT");
    }

    #[test]
    fn test_parse_shipment_response() {
        let json = r#"{
            "id": 12,
            "type": "IN",
            "status": "IN_TRANSIT",
            "tracking_number": "TRACK001",
            "carrier": "FedEx",
            "estimated_arrival": "2026-03-10T12:00:00Z",
            "actual_arrival": null,
            "items": [
                {"id": 1, "item": 7, "quantity": 5, "unit_price": "10.99"},
                {"id": 2, "item": 9, "quantity": 2, "unit_price": "20.50"}
            ],
            "created_by": {"id": 1, "username": "admin"}
        }"#;

        let shipment: Shipment = serde_json::from_str(json).expect("Failed to parse shipment");
        assert_eq!(shipment.shipment_type, ShipmentType::Incoming);
        assert_eq!(shipment.status, ShipmentStatus::InTransit);
        assert_eq!(shipment.total_units(), 7);
        assert!((shipment.total_value() - 95.95).abs() < 1e-9);
    }

    #[test]
    fn test_new_shipment_payload_shape() {
        let shipment = NewShipment {
            shipment_type: ShipmentType::Outgoing,
            status: ShipmentStatus::Pending,
            tracking_number: "TRACK002".to_string(),
            carrier: "UPS".to_string(),
            estimated_arrival: Utc.with_ymd_and_hms(2026, 3, 15, 8, 0, 0).unwrap(),
            items: vec![NewShipmentItem {
                item: 7,
                quantity: 3,
                unit_price: "4.25".to_string(),
            }],
        };

        let value = serde_json::to_value(&shipment).expect("Failed to serialize shipment");
        // The enum field serializes under the backend's `type` key.
        assert_eq!(value["type"], "OUT");
        assert_eq!(value["status"], "PENDING");
        assert_eq!(value["items"][0]["item"], 7);
        assert_eq!(value["items"][0]["unit_price"], "4.25");
        assert!(value.get("actual_arrival").is_none());
    }

    #[test]
    fn test_unit_price_parsing() {
        let line = ShipmentItem {
            id: None,
            item: 1,
            quantity: 4,
            unit_price: "10.99".to_string(),
        };
        assert_eq!(line.unit_price_value(), Some(10.99));
        assert_eq!(line.line_total(), Some(43.96));

        let bad = ShipmentItem {
            id: None,
            item: 1,
            quantity: 4,
            unit_price: "n/a".to_string(),
        };
        assert_eq!(bad.unit_price_value(), None);
        assert_eq!(bad.line_total(), None);
    }
}
