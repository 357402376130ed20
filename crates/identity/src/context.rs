use chrono::{DateTime, Utc};

use stockflow_core::{CompanyId, UserId};

use crate::claims::{AccessClaims, ClaimsError};

/// Identity of the acting user, as the rest of the system sees it.
///
/// Used to default `created_by` on new orders and to scope listings to the
/// user's company. Implementations own where the claims came from.
pub trait IdentityContext {
    fn user_id(&self) -> UserId;
    fn company_id(&self) -> CompanyId;
}

/// Identity backed by validated bearer-token claims.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    claims: AccessClaims,
}

impl TokenIdentity {
    /// Accept decoded claims after checking their time window at `now`.
    pub fn from_claims(claims: AccessClaims, now: DateTime<Utc>) -> Result<Self, ClaimsError> {
        claims.validate_at(now)?;
        Ok(Self { claims })
    }

    pub fn claims(&self) -> &AccessClaims {
        &self.claims
    }
}

impl IdentityContext for TokenIdentity {
    fn user_id(&self) -> UserId {
        self.claims.user_id
    }

    fn company_id(&self) -> CompanyId {
        self.claims.company_id
    }
}

/// Fixed identity for tests and local tooling.
#[derive(Debug, Clone, Copy)]
pub struct StaticIdentity {
    pub user_id: UserId,
    pub company_id: CompanyId,
}

impl IdentityContext for StaticIdentity {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn company_id(&self) -> CompanyId {
        self.company_id
    }
}
