use serde::{Deserialize, Serialize};

/// Transient snapshot of a commerce-backend order. The backend owns the
/// record; this struct lives only for the duration of one operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    /// Backend-defined status string ("pending", "processing", "completed",
    /// "refunded", "cancelled", ...). Not an enum: the value set belongs to
    /// the backend, not to this crate.
    pub status: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub billing: Option<Address>,
    #[serde(default)]
    pub shipping: Option<Address>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub total_tax: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// One product entry within an order, addressed by backend-assigned id and
/// by caller-supplied position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u64,
    pub product_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<u64>,
    pub quantity: u32,
    /// Unit price as the backend renders it (decimal string).
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub subtotal: Option<String>,
    #[serde(default)]
    pub subtotal_tax: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub total_tax: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Write-side line-item entry. Targeting an existing `id` with
/// `quantity: 0` soft-deletes that line; omitting `id` creates a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<u64>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal_tax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tax: Option<String>,
}

/// Partial order update. Only the populated fields are sent upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItemPatch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Address>,
}

impl OrderPatch {
    pub fn status(status: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    pub fn line_items(line_items: Vec<LineItemPatch>) -> Self {
        Self {
            line_items: Some(line_items),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_deserializes_from_backend_json() {
        let payload = serde_json::json!({
            "id": 731,
            "status": "processing",
            "currency": "EUR",
            "total": "20.00",
            "line_items": [
                {"id": 11, "product_id": 5, "quantity": 2,
                 "price": "10.00", "subtotal": "20.00", "total": "20.00",
                 "subtotal_tax": "0.00", "total_tax": "0.00"}
            ],
            "billing": {"first_name": "Ada", "city": "Berlin"}
        });
        let order: Order = serde_json::from_value(payload).expect("order should deserialize");
        assert_eq!(order.id, 731);
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].quantity, 2);
        assert_eq!(
            order.billing.as_ref().and_then(|b| b.city.as_deref()),
            Some("Berlin")
        );
    }

    #[test]
    fn order_patch_serializes_only_populated_fields() {
        let patch = OrderPatch::line_items(vec![
            LineItemPatch {
                id: Some(11),
                quantity: 0,
                ..Default::default()
            },
            LineItemPatch {
                product_id: Some(5),
                quantity: 1,
                total: Some("12.00".to_string()),
                ..Default::default()
            },
        ])
        .with_status("pending");

        let json = serde_json::to_value(&patch).expect("patch should serialize");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["line_items"][0]["id"], 11);
        assert_eq!(json["line_items"][0]["quantity"], 0);
        assert!(json["line_items"][0].get("product_id").is_none());
        assert!(json.get("billing").is_none());
        assert!(json.get("shipping").is_none());
    }
}
