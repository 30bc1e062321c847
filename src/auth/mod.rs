//! Authentication module
//!
//! Supports: Basic (API key), Bearer (personal access token), Custom Headers
//!
//! Credentials are static; acquiring or refreshing them (OAuth flows) is
//! left to the caller, who hands the resulting token to the client.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;

#[cfg(test)]
mod tests;
