//! Dashboard aggregates returned by `/api/inventory/dashboard_data/`.

use serde::{Deserialize, Serialize};

use super::ShipmentType;

/// Aggregate data for the dashboard tab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub shipment_activity: Vec<ShipmentActivity>,
    #[serde(default)]
    pub top_items: Vec<TopItem>,
}

/// Shipment count for one direction over the reporting window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentActivity {
    #[serde(rename = "type")]
    pub shipment_type: ShipmentType,
    pub count: i64,
}

/// A high-quantity item with its stock floor, for the top-items chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopItem {
    pub name: String,
    pub quantity: i64,
    pub minimum_stock: i64,
}

impl DashboardData {
    /// Activity count for one direction, zero when the backend omits it.
    pub fn activity_count(&self, shipment_type: ShipmentType) -> i64 {
        self.shipment_activity
            .iter()
            .find(|a| a.shipment_type == shipment_type)
            .map(|a| a.count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_response() {
        let json = r#"{
            "shipment_activity": [
                {"type": "IN", "count": 14},
                {"type": "OUT", "count": 9}
            ],
            "top_items": [
                {"name": "Hex Bolt M8", "quantity": 420, "minimum_stock": 100}
            ]
        }"#;

        let data: DashboardData = serde_json::from_str(json).expect("Failed to parse dashboard");
        assert_eq!(data.activity_count(ShipmentType::Incoming), 14);
        assert_eq!(data.activity_count(ShipmentType::Outgoing), 9);
        assert_eq!(data.top_items.len(), 1);
    }

    #[test]
    fn test_activity_count_defaults_to_zero() {
        let data = DashboardData::default();
        assert_eq!(data.activity_count(ShipmentType::Incoming), 0);

        let json = r#"{"shipment_activity": [{"type": "IN", "count": 3}], "top_items": []}"#;
        let data: DashboardData = serde_json::from_str(json).unwrap();
        assert_eq!(data.activity_count(ShipmentType::Outgoing), 0);
    }
}
