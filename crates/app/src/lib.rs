//! `stockflow-app` — session layer tying the domain to the order service.
//!
//! A [`session::Session`] owns one purchase-order store, at most one
//! receiving workflow, the HTTP client, and the identity context, and
//! exposes the explicit command handlers a UI layer calls. The UI holds no
//! business logic; everything it can do is a method here.

pub mod config;
pub mod session;

pub use config::AppConfig;
pub use session::{Session, SessionError};
