use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockflow_core::{CompanyId, UserId};

/// Decoded bearer-token claims (transport-agnostic).
///
/// This is the minimal claim set the client expects once a token has been
/// decoded and verified by whatever security layer is in use. Some token
/// issuers put the user id in `sub` rather than `userId`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Acting user.
    #[serde(rename = "userId", alias = "sub")]
    pub user_id: UserId,

    /// Company context the token was issued for.
    #[serde(rename = "companyId")]
    pub company_id: CompanyId,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

impl AccessClaims {
    /// Deterministically validate the claim time window at `now`.
    ///
    /// Signature verification / decoding is intentionally outside this crate.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), ClaimsError> {
        if self.expires_at <= self.issued_at {
            return Err(ClaimsError::InvalidTimeWindow);
        }
        if now < self.issued_at {
            return Err(ClaimsError::NotYetValid);
        }
        if now >= self.expires_at {
            return Err(ClaimsError::Expired);
        }
        Ok(())
    }
}
