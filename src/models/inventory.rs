//! Inventory item models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// An inventory item as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: String,
    pub quantity: i64,
    pub location: String,
    pub category: String,
    pub minimum_stock: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(default)]
    pub last_updated_by: Option<User>,
}

impl InventoryItem {
    /// An item is low on stock when it is at or below its minimum level.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_stock
    }
}

/// Write shape for creating or replacing an item. Server-managed fields
/// (timestamps, audit users) are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewInventoryItem {
    pub name: String,
    pub sku: String,
    pub description: String,
    pub quantity: i64,
    pub location: String,
    pub category: String,
    pub minimum_stock: i64,
}

/// Sort order for the inventory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventorySortColumn {
    Name,
    Sku,
    Quantity,
    Category,
}

impl InventorySortColumn {
    pub fn title(&self) -> &'static str {
        match self {
            InventorySortColumn::Name => "Name",
            InventorySortColumn::Sku => "SKU",
            InventorySortColumn::Quantity => "Qty",
            InventorySortColumn::Category => "Category",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, minimum_stock: i64) -> InventoryItem {
        InventoryItem {
            id: 1,
            name: "Widget".to_string(),
            sku: "SKU001".to_string(),
            description: String::new(),
            quantity,
            location: "A1".to_string(),
            category: "Parts".to_string(),
            minimum_stock,
            created_at: None,
            updated_at: None,
            created_by: None,
            last_updated_by: None,
        }
    }

    #[test]
    fn test_is_low_stock() {
        assert!(item(5, 10).is_low_stock());
        assert!(item(10, 10).is_low_stock()); // at the boundary counts as low
        assert!(!item(11, 10).is_low_stock());
        assert!(item(0, 0).is_low_stock());
    }

    #[test]
    fn test_parse_inventory_response() {
        let json = r#"{
            "id": 7,
            "name": "Hex Bolt M8",
            "sku": "HB-M8-100",
            "description": "Box of 100",
            "quantity": 42,
            "location": "Aisle 3, Shelf B",
            "category": "Fasteners",
            "minimum_stock": 20,
            "created_at": "2026-01-12T09:30:00Z",
            "updated_at": "2026-02-01T16:05:00Z",
            "created_by": {"id": 1, "username": "admin", "is_staff": true},
            "last_updated_by": null
        }"#;

        let item: InventoryItem = serde_json::from_str(json).expect("Failed to parse item JSON");
        assert_eq!(item.sku, "HB-M8-100");
        assert_eq!(item.quantity, 42);
        assert!(!item.is_low_stock());
        assert_eq!(item.created_by.as_ref().map(|u| u.id), Some(1));
        assert!(item.last_updated_by.is_none());
    }

    #[test]
    fn test_new_item_payload_omits_server_fields() {
        let new_item = NewInventoryItem {
            name: "Widget".to_string(),
            sku: "SKU001".to_string(),
            description: String::new(),
            quantity: 3,
            location: "A1".to_string(),
            category: "Parts".to_string(),
            minimum_stock: 1,
        };
        let value = serde_json::to_value(&new_item).expect("Failed to serialize new item");
        let obj = value.as_object().expect("expected JSON object");
        assert!(obj.contains_key("sku"));
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("created_at"));
        assert!(!obj.contains_key("created_by"));
    }
}
