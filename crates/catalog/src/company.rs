use serde::{Deserialize, Serialize};

use stockflow_core::CompanyId;

/// A company, as returned by `/companies` and `/users/{id}/companies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}
