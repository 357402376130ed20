use thiserror::Error;

use stockflow_core::{LineItemId, OrderId};
use stockflow_orders::{LineItem, ProductRef, PurchaseOrder, ReceiptLine};

/// Receiving state machine.
///
/// `Idle → Prepared → Submitting → Completed`, with `Submitting → Prepared`
/// on failure so the user can retry with adjusted quantities, and
/// `Prepared → Idle` on cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceivingState {
    Idle,
    Prepared,
    Submitting,
    Completed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReceivingError {
    /// Receiving can only begin on a pending order.
    #[error("order {0} is not pending")]
    NotPending(OrderId),

    /// Nothing staged above zero; submitting would be a no-op network call.
    #[error("no quantities staged to receive")]
    EmptyReceipt,

    /// The item is not part of the order being received.
    #[error("unknown line item {0}")]
    UnknownItem(LineItemId),

    /// Staged quantity outside `[0, remaining]`.
    #[error("cannot receive {quantity} for item {item}: {remaining} remaining")]
    QuantityOutOfRange {
        item: LineItemId,
        quantity: i64,
        remaining: i64,
    },

    /// The operation is not legal in the workflow's current state.
    #[error("operation not legal in {0:?} state")]
    InvalidState(ReceivingState),
}

/// One outstanding line of the receipt being prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveLine {
    pub item_id: LineItemId,
    pub product: ProductRef,
    /// Outstanding quantity at the time receiving began.
    pub remaining: i64,
    /// Quantity staged for this receipt, in `[0, remaining]`.
    pub staged: i64,
}

/// Converts a pending order's outstanding quantities into a receipt batch.
#[derive(Debug, Clone)]
pub struct ReceivingWorkflow {
    order_id: OrderId,
    state: ReceivingState,
    lines: Vec<ReceiveLine>,
}

impl ReceivingWorkflow {
    /// Begin receiving against `order`. Legal only while the order is
    /// pending; every item starts with a staged quantity of zero.
    ///
    /// Items the order service has not assigned an id yet cannot appear on a
    /// receipt and are skipped.
    pub fn begin(order: &PurchaseOrder) -> Result<Self, ReceivingError> {
        if !order.is_pending() {
            return Err(ReceivingError::NotPending(order.id));
        }

        let lines = order
            .items
            .iter()
            .filter_map(|item| {
                item.id.map(|item_id| ReceiveLine {
                    item_id,
                    product: item.product.clone(),
                    remaining: item.remaining(),
                    staged: 0,
                })
            })
            .collect();

        Ok(Self {
            order_id: order.id,
            state: ReceivingState::Prepared,
            lines,
        })
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn state(&self) -> ReceivingState {
        self.state
    }

    pub fn lines(&self) -> &[ReceiveLine] {
        &self.lines
    }

    fn ensure_state(&self, expected: ReceivingState) -> Result<(), ReceivingError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ReceivingError::InvalidState(self.state))
        }
    }

    /// Stage a receive quantity for one item.
    ///
    /// Out-of-range values are refused rather than clamped: the workflow
    /// feeds the API, and a silently adjusted quantity would record a
    /// receipt the user never asked for.
    pub fn set_quantity(&mut self, item: LineItemId, quantity: i64) -> Result<(), ReceivingError> {
        self.ensure_state(ReceivingState::Prepared)?;

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.item_id == item)
            .ok_or(ReceivingError::UnknownItem(item))?;

        if quantity < 0 || quantity > line.remaining {
            return Err(ReceivingError::QuantityOutOfRange {
                item,
                quantity,
                remaining: line.remaining,
            });
        }

        line.staged = quantity;
        Ok(())
    }

    /// Build the receipt batch from lines staged above zero and enter
    /// `Submitting`.
    ///
    /// Fails with [`ReceivingError::EmptyReceipt`] before any network call
    /// when nothing is staged; the workflow stays in `Prepared`.
    pub fn submit(&mut self) -> Result<Vec<ReceiptLine>, ReceivingError> {
        self.ensure_state(ReceivingState::Prepared)?;

        let batch: Vec<ReceiptLine> = self
            .lines
            .iter()
            .filter(|line| line.staged > 0)
            .map(|line| ReceiptLine {
                item_id: line.item_id,
                quantity: line.staged,
            })
            .collect();

        if batch.is_empty() {
            return Err(ReceivingError::EmptyReceipt);
        }

        self.state = ReceivingState::Submitting;
        Ok(batch)
    }

    /// The order service accepted the receipt.
    pub fn complete(&mut self) -> Result<(), ReceivingError> {
        self.ensure_state(ReceivingState::Submitting)?;
        self.state = ReceivingState::Completed;
        Ok(())
    }

    /// Transport failure or server rejection: back to `Prepared` with the
    /// staged quantities intact, so the user may retry after adjusting.
    pub fn fail(&mut self) -> Result<(), ReceivingError> {
        self.ensure_state(ReceivingState::Submitting)?;
        self.state = ReceivingState::Prepared;
        Ok(())
    }

    /// Discard all staged quantities and return to `Idle`.
    pub fn cancel(&mut self) -> Result<(), ReceivingError> {
        self.ensure_state(ReceivingState::Prepared)?;
        for line in &mut self.lines {
            line.staged = 0;
        }
        self.state = ReceivingState::Idle;
        Ok(())
    }
}

/// Fraction of an item's ordered quantity already received, for the
/// per-item progress display on pending orders.
pub fn receipt_progress(item: &LineItem) -> f64 {
    if item.quantity <= 0 {
        return 0.0;
    }
    (item.received_quantity as f64 / item.quantity as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use stockflow_core::{CompanyId, ProductId};
    use stockflow_orders::{line_subtotal, CompanyRef, PurchaseOrderStatus};

    fn item(id: i64, quantity: i64, received: i64) -> LineItem {
        LineItem {
            id: Some(LineItemId::new(id)),
            product: ProductRef::by_id(ProductId::new(5)),
            quantity,
            unit_price: dec!(2.50),
            subtotal: line_subtotal(quantity, dec!(2.50)),
            received_quantity: received,
        }
    }

    fn order(status: PurchaseOrderStatus, items: Vec<LineItem>) -> PurchaseOrder {
        let total = items.iter().map(|i| i.subtotal).sum();
        PurchaseOrder {
            id: OrderId::new(9),
            po_number: "PO-9".to_string(),
            company: CompanyRef::by_id(CompanyId::new(1)),
            created_by: None,
            supplier: "Beans Inc".to_string(),
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
    fn begin_computes_remaining_and_stages_zero() {
        let po = order(
            PurchaseOrderStatus::Pending,
            vec![item(100, 10, 4), item(101, 3, 3)],
        );
        let wf = ReceivingWorkflow::begin(&po).unwrap();

        assert_eq!(wf.state(), ReceivingState::Prepared);
        assert_eq!(wf.lines()[0].remaining, 6);
        assert_eq!(wf.lines()[0].staged, 0);
        assert_eq!(wf.lines()[1].remaining, 0);
    }

    #[test]
    fn begin_rejects_received_orders() {
        let po = order(PurchaseOrderStatus::Received, vec![item(100, 10, 10)]);
        assert_eq!(
            ReceivingWorkflow::begin(&po).unwrap_err(),
            ReceivingError::NotPending(OrderId::new(9))
        );
    }

    #[test]
    fn set_quantity_rejects_beyond_remaining() {
        let po = order(PurchaseOrderStatus::Pending, vec![item(100, 10, 4)]);
        let mut wf = ReceivingWorkflow::begin(&po).unwrap();

        assert_eq!(
            wf.set_quantity(LineItemId::new(100), 7).unwrap_err(),
            ReceivingError::QuantityOutOfRange {
                item: LineItemId::new(100),
                quantity: 7,
                remaining: 6,
            }
        );
        assert!(wf.set_quantity(LineItemId::new(100), -1).is_err());
        assert!(wf.set_quantity(LineItemId::new(100), 6).is_ok());
    }

    #[test]
    fn set_quantity_rejects_unknown_items() {
        let po = order(PurchaseOrderStatus::Pending, vec![item(100, 10, 0)]);
        let mut wf = ReceivingWorkflow::begin(&po).unwrap();
        assert_eq!(
            wf.set_quantity(LineItemId::new(999), 1).unwrap_err(),
            ReceivingError::UnknownItem(LineItemId::new(999))
        );
    }

    #[test]
    fn submit_with_nothing_staged_is_an_empty_receipt() {
        let po = order(PurchaseOrderStatus::Pending, vec![item(100, 10, 0)]);
        let mut wf = ReceivingWorkflow::begin(&po).unwrap();

        assert_eq!(wf.submit().unwrap_err(), ReceivingError::EmptyReceipt);
        // Still prepared; the user can stage quantities and try again.
        assert_eq!(wf.state(), ReceivingState::Prepared);
    }

    #[test]
    fn submit_filters_to_staged_lines() {
        let po = order(
            PurchaseOrderStatus::Pending,
            vec![item(100, 10, 0), item(101, 5, 0)],
        );
        let mut wf = ReceivingWorkflow::begin(&po).unwrap();
        wf.set_quantity(LineItemId::new(100), 4).unwrap();

        let batch = wf.submit().unwrap();
        assert_eq!(
            batch,
            vec![ReceiptLine {
                item_id: LineItemId::new(100),
                quantity: 4,
            }]
        );
        assert_eq!(wf.state(), ReceivingState::Submitting);
    }

    #[test]
    fn failure_returns_to_prepared_with_staged_quantities_kept() {
        let po = order(PurchaseOrderStatus::Pending, vec![item(100, 10, 0)]);
        let mut wf = ReceivingWorkflow::begin(&po).unwrap();
        wf.set_quantity(LineItemId::new(100), 4).unwrap();
        wf.submit().unwrap();

        wf.fail().unwrap();
        assert_eq!(wf.state(), ReceivingState::Prepared);
        assert_eq!(wf.lines()[0].staged, 4);

        // And the retry can go through.
        assert!(wf.submit().is_ok());
        wf.complete().unwrap();
        assert_eq!(wf.state(), ReceivingState::Completed);
    }

    #[test]
    fn cancel_discards_staged_quantities() {
        let po = order(PurchaseOrderStatus::Pending, vec![item(100, 10, 0)]);
        let mut wf = ReceivingWorkflow::begin(&po).unwrap();
        wf.set_quantity(LineItemId::new(100), 4).unwrap();

        wf.cancel().unwrap();
        assert_eq!(wf.state(), ReceivingState::Idle);
        assert_eq!(wf.lines()[0].staged, 0);

        // Nothing is legal from idle but a fresh begin.
        assert!(matches!(
            wf.set_quantity(LineItemId::new(100), 1),
            Err(ReceivingError::InvalidState(ReceivingState::Idle))
        ));
        assert!(matches!(
            wf.submit(),
            Err(ReceivingError::InvalidState(ReceivingState::Idle))
        ));
    }

    #[test]
    fn complete_is_only_legal_while_submitting() {
        let po = order(PurchaseOrderStatus::Pending, vec![item(100, 10, 0)]);
        let mut wf = ReceivingWorkflow::begin(&po).unwrap();
        assert!(matches!(
            wf.complete(),
            Err(ReceivingError::InvalidState(ReceivingState::Prepared))
        ));
    }

    #[test]
    fn progress_is_received_over_ordered() {
        assert_eq!(receipt_progress(&item(100, 10, 4)), 0.4);
        assert_eq!(receipt_progress(&item(100, 10, 10)), 1.0);
        assert_eq!(receipt_progress(&item(100, 0, 0)), 0.0);
    }
}
