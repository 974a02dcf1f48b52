//! Authentication module
//!
//! OAuth2 client credentials against the Criteo token endpoint. The
//! `AuthSession` caches the token and refreshes it shortly before expiry.

mod session;
mod types;

pub use session::AuthSession;
pub use types::{CachedToken, ClientCredentials, TOKEN_REFRESH_MARGIN_SECS};

#[cfg(test)]
mod tests;
