//! Command payloads sent to the order service.
//!
//! These are built by [`crate::store::PurchaseOrderStore`] after local
//! validation has passed; the client crate only ships them over the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockflow_core::{LineItemId, OrderId};

use crate::order::{CompanyRef, ProductRef, PurchaseOrderStatus, UserRef};

/// `POST /purchase-orders` body: a draft order with its full staged item
/// list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub po_number: String,
    pub company: CompanyRef,
    pub created_by: UserRef,
    pub supplier: String,
    pub order_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub status: PurchaseOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<NewLineItem>,
}

/// A line item on a create payload, or the `POST .../items` body when adding
/// to an existing order. `received_quantity` always starts at 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    pub product: ProductRef,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub received_quantity: i64,
}

/// `PUT /purchase-orders/{id}` body.
///
/// Items are deliberately absent: after creation, item mutation goes through
/// the dedicated per-item endpoints, never a bulk overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    pub po_number: String,
    pub company: CompanyRef,
    pub supplier: String,
    pub order_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub status: PurchaseOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `PUT /purchase-orders/items/{itemId}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemUpdate {
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// One line of a `POST .../receive-inventory` batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub item_id: LineItemId,
    pub quantity: i64,
}

/// What submitting the order form amounts to: a create for a new draft, an
/// update for an order that already has a server id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOrder {
    Create(CreateOrder),
    Update(OrderId, UpdateOrder),
}
