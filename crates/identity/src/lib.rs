//! `stockflow-identity` — identity context boundary.
//!
//! The core never parses bearer tokens. Whatever transport layer holds the
//! session decodes and verifies the token, then hands this crate the claims;
//! from there on the rest of the system only sees [`IdentityContext`].

pub mod claims;
pub mod context;

pub use claims::{AccessClaims, ClaimsError};
pub use context::{IdentityContext, StaticIdentity, TokenIdentity};
