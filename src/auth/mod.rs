//! Authentication module
//!
//! Supports: pre-formed access tokens placed in a query parameter or header,
//! and bearer tokens.
//!
//! Tokens are supplied by the host application; nothing here fetches or
//! refreshes them.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location};
