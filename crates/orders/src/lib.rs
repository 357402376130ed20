//! Purchase orders domain module.
//!
//! This crate contains the client-visible purchase order model and the
//! business rules guarding every mutation, implemented purely as
//! deterministic domain logic (no IO, no HTTP). Persistence happens through
//! the order service; after each accepted mutation the store is refreshed
//! from the server's canonical response.

pub mod command;
pub mod order;
pub mod store;

pub use command::{
    CreateOrder, LineItemUpdate, NewLineItem, ReceiptLine, SubmitOrder, UpdateOrder,
};
pub use order::{
    line_subtotal, CompanyRef, LineItem, ProductRef, PurchaseOrder, PurchaseOrderStatus, UserRef,
};
pub use store::{OrderForm, PurchaseOrderStore, StagedItem};
