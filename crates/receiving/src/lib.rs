//! Receiving workflow: recording goods physically received against a
//! pending purchase order's outstanding line items.
//!
//! Layered on top of the orders store. The workflow computes the remaining
//! quantity per item, validates staged receive quantities, and hands a
//! receipt batch to the network layer; the order service recomputes
//! `received_quantity` and flips the status to received once the order is
//! fully satisfied.

pub mod workflow;

pub use workflow::{
    receipt_progress, ReceiveLine, ReceivingError, ReceivingState, ReceivingWorkflow,
};
