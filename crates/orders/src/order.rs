use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockflow_core::{CompanyId, DomainError, DomainResult, LineItemId, OrderId, ProductId, UserId};

/// Purchase order status lifecycle.
///
/// Pending is the only state the client may mutate. Received is terminal for
/// line-item edits and deletion, and is only ever assigned by the order
/// service once a receipt satisfies the full ordered quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Pending,
    Received,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "PENDING",
            PurchaseOrderStatus::Received => "RECEIVED",
        }
    }
}

/// Company reference as exchanged with the order service.
///
/// Requests carry only the id; responses embed the display name too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    pub id: CompanyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CompanyRef {
    pub fn by_id(id: CompanyId) -> Self {
        Self { id, name: None }
    }
}

/// User reference (`createdBy` on orders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
}

/// Product reference on a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ProductRef {
    pub fn by_id(id: ProductId) -> Self {
        Self { id, name: None }
    }
}

/// One product line within a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Assigned by the order service; absent while staged client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LineItemId>,
    pub product: ProductRef,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    #[serde(default)]
    pub received_quantity: i64,
}

impl LineItem {
    /// Quantity still outstanding: `quantity - received_quantity`.
    pub fn remaining(&self) -> i64 {
        self.quantity - self.received_quantity
    }

    pub fn fully_received(&self) -> bool {
        self.received_quantity >= self.quantity
    }
}

/// Compute a line subtotal. Kept in one place so `subtotal` can never
/// diverge from `quantity * unit_price`.
pub fn line_subtotal(quantity: i64, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

/// Client-side snapshot of one purchase order, as served by the order
/// service. Drafts that have not been submitted yet live in
/// [`crate::store::OrderForm`], so a snapshot always carries an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: OrderId,
    pub po_number: String,
    pub company: CompanyRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    pub supplier: String,
    pub order_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub status: PurchaseOrderStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    pub fn is_pending(&self) -> bool {
        self.status == PurchaseOrderStatus::Pending
    }

    /// Sum of line subtotals. Equals `total_amount` on any snapshot the
    /// order service produced.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|item| item.subtotal).sum()
    }

    pub fn item(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == Some(id))
    }

    /// Guard for mutations that are only legal while the order is pending.
    pub fn ensure_pending(&self, action: &str) -> DomainResult<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(DomainError::business_rule(format!(
                "cannot {action}: order {} is {}",
                self.id,
                self.status.as_str()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: i64, quantity: i64, unit_price: Decimal, received: i64) -> LineItem {
        LineItem {
            id: Some(LineItemId::new(id)),
            product: ProductRef::by_id(ProductId::new(5)),
            quantity,
            unit_price,
            subtotal: line_subtotal(quantity, unit_price),
            received_quantity: received,
        }
    }

    fn order(status: PurchaseOrderStatus, items: Vec<LineItem>) -> PurchaseOrder {
        let total = items.iter().map(|i| i.subtotal).sum();
        PurchaseOrder {
            id: OrderId::new(1),
            po_number: "PO-1".to_string(),
            company: CompanyRef::by_id(CompanyId::new(1)),
            created_by: Some(UserRef {
                id: UserId::new(7),
            }),
            supplier: "Acme Supply Co".to_string(),
            order_date: Utc::now(),
            expected_delivery_date: None,
            status,
            items,
            total_amount: total,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn remaining_is_quantity_minus_received() {
        let line = item(100, 10, dec!(2.50), 4);
        assert_eq!(line.remaining(), 6);
        assert!(!line.fully_received());
    }

    #[test]
    fn items_total_matches_total_amount() {
        let po = order(
            PurchaseOrderStatus::Pending,
            vec![item(1, 10, dec!(2.50), 0), item(2, 3, dec!(1.10), 0)],
        );
        assert_eq!(po.items_total(), dec!(28.30));
        assert_eq!(po.items_total(), po.total_amount);
    }

    #[test]
    fn ensure_pending_rejects_received_orders() {
        let po = order(PurchaseOrderStatus::Received, Vec::new());
        let err = po.ensure_pending("edit items").unwrap_err();
        assert!(matches!(err, DomainError::BusinessRule(_)));
    }

    #[test]
    fn deserializes_service_snapshot() {
        let json = r#"{
            "id": 9,
            "poNumber": "PO-9",
            "company": {"id": 1, "name": "Acme"},
            "supplier": "Beans Inc",
            "orderDate": "2026-01-05T00:00:00Z",
            "status": "PENDING",
            "items": [
                {"id": 100, "product": {"id": 5, "name": "Beans"},
                 "quantity": 10, "unitPrice": 2.5, "subtotal": 25.0,
                 "receivedQuantity": 4}
            ],
            "totalAmount": 25.0
        }"#;
        let po: PurchaseOrder = serde_json::from_str(json).unwrap();
        assert!(po.is_pending());
        assert_eq!(po.items[0].remaining(), 6);
        assert_eq!(po.item(LineItemId::new(100)).unwrap().quantity, 10);
    }
}
