//! The one currently viewed/edited purchase order and its staged edits.
//!
//! State that the original client kept in ambient globals lives here as an
//! explicit store instance: the viewed snapshot and the open order form.
//! Every mutation is checked against the business rules before a payload is
//! handed to the network layer; after the order service accepts, the store
//! is refreshed from the canonical response via [`PurchaseOrderStore::apply_refresh`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use stockflow_catalog::Product;
use stockflow_core::{DomainError, DomainResult, LineItemId, OrderId, UserId};

use crate::command::{
    CreateOrder, LineItemUpdate, NewLineItem, SubmitOrder, UpdateOrder,
};
use crate::order::{
    line_subtotal, CompanyRef, ProductRef, PurchaseOrder, PurchaseOrderStatus, UserRef,
};

/// A line item staged on the order form, before the order service has
/// assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedItem {
    pub product: ProductRef,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// The open create/edit form.
///
/// Plain fields are set directly by the UI layer; the staged item list is
/// private so its subtotals can only be produced by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderForm {
    editing: Option<OrderId>,
    pub po_number: String,
    pub company: Option<CompanyRef>,
    pub supplier: String,
    pub order_date: Option<DateTime<Utc>>,
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub status: PurchaseOrderStatus,
    pub notes: String,
    items: Vec<StagedItem>,
}

impl OrderForm {
    fn for_create() -> Self {
        Self {
            editing: None,
            po_number: String::new(),
            company: None,
            supplier: String::new(),
            order_date: None,
            expected_delivery_date: None,
            status: PurchaseOrderStatus::Pending,
            notes: String::new(),
            items: Vec::new(),
        }
    }

    fn for_edit(order: &PurchaseOrder) -> Self {
        Self {
            editing: Some(order.id),
            po_number: order.po_number.clone(),
            company: Some(order.company.clone()),
            supplier: order.supplier.clone(),
            order_date: Some(order.order_date),
            expected_delivery_date: order.expected_delivery_date,
            status: order.status,
            notes: order.notes.clone().unwrap_or_default(),
            items: order
                .items
                .iter()
                .map(|item| StagedItem {
                    product: item.product.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    subtotal: item.subtotal,
                })
                .collect(),
        }
    }

    /// The order being edited, if this form was opened from an existing one.
    pub fn editing(&self) -> Option<OrderId> {
        self.editing
    }

    pub fn items(&self) -> &[StagedItem] {
        &self.items
    }

    /// Sum of staged subtotals; the form's running total.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.subtotal).sum()
    }
}

/// Store for the purchase order currently on screen.
#[derive(Debug, Default)]
pub struct PurchaseOrderStore {
    viewing: Option<PurchaseOrder>,
    form: Option<OrderForm>,
}

fn validate_item_input(quantity: i64, unit_price: Decimal) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    if unit_price < Decimal::ZERO {
        return Err(DomainError::validation("unit price must not be negative"));
    }
    Ok(())
}

impl PurchaseOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewing(&self) -> Option<&PurchaseOrder> {
        self.viewing.as_ref()
    }

    pub fn set_viewing(&mut self, order: PurchaseOrder) {
        self.viewing = Some(order);
    }

    pub fn clear_viewing(&mut self) {
        self.viewing = None;
    }

    /// Replace the viewed snapshot with the order service's canonical
    /// response to an accepted mutation.
    pub fn apply_refresh(&mut self, order: PurchaseOrder) -> &PurchaseOrder {
        self.viewing.insert(order)
    }

    pub fn form(&self) -> Option<&OrderForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut OrderForm> {
        self.form.as_mut()
    }

    /// Open a blank form for a new draft order.
    pub fn open_create(&mut self) -> &mut OrderForm {
        self.form.insert(OrderForm::for_create())
    }

    /// Open the form pre-filled from the viewed order.
    ///
    /// Only pending orders can be edited; the staged item list is loaded for
    /// display, but an edit submission never carries items (see
    /// [`UpdateOrder`]).
    pub fn open_edit(&mut self) -> DomainResult<&mut OrderForm> {
        let order = self.viewing.as_ref().ok_or_else(DomainError::not_found)?;
        order.ensure_pending("edit the order")?;
        Ok(self.form.insert(OrderForm::for_edit(order)))
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Stage a line item on the open form.
    ///
    /// Rejects non-positive quantities, negative prices, and products owned
    /// by a different company than the form's. On success the subtotal is
    /// computed and the staged list appended.
    pub fn stage_item(
        &mut self,
        product: &Product,
        quantity: i64,
        unit_price: Decimal,
    ) -> DomainResult<&StagedItem> {
        let form = self
            .form
            .as_mut()
            .ok_or_else(|| DomainError::business_rule("no order form is open"))?;

        validate_item_input(quantity, unit_price)?;

        if let (Some(company), Some(owner)) = (&form.company, &product.company) {
            if owner.id != company.id {
                return Err(DomainError::validation(format!(
                    "product {} belongs to a different company",
                    product.name
                )));
            }
        }

        form.items.push(StagedItem {
            product: ProductRef {
                id: product.id,
                name: Some(product.name.clone()),
            },
            quantity,
            unit_price,
            subtotal: line_subtotal(quantity, unit_price),
        });
        Ok(form.items.last().expect("just pushed"))
    }

    /// Remove a staged item by position.
    ///
    /// Out-of-bounds indexes are a silent no-op so that an idempotent UI
    /// retry cannot fail.
    pub fn remove_staged_item(&mut self, index: usize) {
        if let Some(form) = self.form.as_mut() {
            if index < form.items.len() {
                form.items.remove(index);
            }
        }
    }

    /// Validate the open form and build the submission payload.
    ///
    /// A form without a server id becomes a create carrying the full staged
    /// item list; an edit becomes a fields-only update.
    pub fn submit_payload(&self, created_by: UserId) -> DomainResult<SubmitOrder> {
        let form = self
            .form
            .as_ref()
            .ok_or_else(|| DomainError::business_rule("no order form is open"))?;

        if form.po_number.trim().is_empty() {
            return Err(DomainError::validation("PO number is required"));
        }
        let company = form
            .company
            .clone()
            .ok_or_else(|| DomainError::validation("company is required"))?;
        if form.supplier.trim().is_empty() {
            return Err(DomainError::validation("supplier is required"));
        }
        let order_date = form
            .order_date
            .ok_or_else(|| DomainError::validation("order date is required"))?;

        let notes = if form.notes.trim().is_empty() {
            None
        } else {
            Some(form.notes.clone())
        };

        if let Some(id) = form.editing {
            return Ok(SubmitOrder::Update(
                id,
                UpdateOrder {
                    po_number: form.po_number.clone(),
                    company: CompanyRef::by_id(company.id),
                    supplier: form.supplier.clone(),
                    order_date,
                    expected_delivery_date: form.expected_delivery_date,
                    status: form.status,
                    notes,
                },
            ));
        }

        if form.items.is_empty() {
            return Err(DomainError::validation(
                "at least one line item is required",
            ));
        }

        Ok(SubmitOrder::Create(CreateOrder {
            po_number: form.po_number.clone(),
            company: CompanyRef::by_id(company.id),
            created_by: UserRef { id: created_by },
            supplier: form.supplier.clone(),
            order_date,
            expected_delivery_date: form.expected_delivery_date,
            status: form.status,
            notes,
            items: form
                .items
                .iter()
                .map(|item| NewLineItem {
                    product: ProductRef::by_id(item.product.id),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    subtotal: item.subtotal,
                    received_quantity: 0,
                })
                .collect(),
        }))
    }

    /// Build the payload for adding one item to the viewed order.
    ///
    /// The order service is the final arbiter, but the pending pre-check
    /// saves a round trip that is known to fail.
    pub fn add_item_payload(
        &self,
        product: &Product,
        quantity: i64,
        unit_price: Decimal,
    ) -> DomainResult<(OrderId, NewLineItem)> {
        let order = self.viewing.as_ref().ok_or_else(DomainError::not_found)?;
        order.ensure_pending("add an item")?;
        validate_item_input(quantity, unit_price)?;

        if let Some(owner) = &product.company {
            if owner.id != order.company.id {
                return Err(DomainError::validation(format!(
                    "product {} belongs to a different company",
                    product.name
                )));
            }
        }

        Ok((
            order.id,
            NewLineItem {
                product: ProductRef::by_id(product.id),
                quantity,
                unit_price,
                subtotal: line_subtotal(quantity, unit_price),
                received_quantity: 0,
            },
        ))
    }

    /// Build the payload for editing one of the viewed order's items,
    /// recomputing the subtotal.
    pub fn edit_item_payload(
        &self,
        item: LineItemId,
        quantity: i64,
        unit_price: Decimal,
    ) -> DomainResult<LineItemUpdate> {
        let order = self.viewing.as_ref().ok_or_else(DomainError::not_found)?;
        order.ensure_pending("edit an item")?;
        if order.item(item).is_none() {
            return Err(DomainError::not_found());
        }
        validate_item_input(quantity, unit_price)?;

        Ok(LineItemUpdate {
            quantity,
            unit_price,
            subtotal: line_subtotal(quantity, unit_price),
        })
    }

    /// Pre-check for removing one of the viewed order's items.
    pub fn delete_item_check(&self, item: LineItemId) -> DomainResult<LineItemId> {
        let order = self.viewing.as_ref().ok_or_else(DomainError::not_found)?;
        order.ensure_pending("remove an item")?;
        if order.item(item).is_none() {
            return Err(DomainError::not_found());
        }
        Ok(item)
    }

    /// The viewed order's id, for deletion.
    ///
    /// Deliberately no status pre-check: the status may have changed since
    /// the last fetch, so the order service arbitrates and its rejection is
    /// surfaced to the user as a business-rule error.
    pub fn delete_order_id(&self) -> DomainResult<OrderId> {
        self.viewing
            .as_ref()
            .map(|order| order.id)
            .ok_or_else(DomainError::not_found)
    }
}
