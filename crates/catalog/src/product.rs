use serde::{Deserialize, Serialize};

use stockflow_core::{CompanyId, ProductId};

use crate::company::Company;

/// A product, as returned by `/products`.
///
/// `company` is the owning company. The order service may omit it on some
/// legacy records, so product pickers must tolerate its absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub company: Option<Company>,
}

impl Product {
    /// Whether this product may appear on an order for `company`.
    ///
    /// Products with no recorded owner are excluded; the authoritative check
    /// stays with the order service.
    pub fn owned_by(&self, company: CompanyId) -> bool {
        self.company.as_ref().is_some_and(|c| c.id == company)
    }
}

/// In-memory snapshot of the reference data needed to build valid orders.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    companies: Vec<Company>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, companies: Vec<Company>) -> Self {
        Self {
            products,
            companies,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn company(&self, id: CompanyId) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    /// Product choices for an order, restricted to the order's company.
    pub fn products_for_company(
        &self,
        company: CompanyId,
    ) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.owned_by(company))
    }
}
