//! Catalog reference data (products and companies).
//!
//! Read-only snapshots of what the order service exposes under `/products`
//! and `/companies`. Line items may only reference products owned by the
//! order's company; `Catalog::products_for_company` is the client-side edge
//! of that rule (the order service remains the authority).

pub mod company;
pub mod product;

pub use company::Company;
pub use product::{Catalog, Product};
