//! Portal abstraction layer
//!
//! The authentication flow sits behind a small trait so the CLI and tests
//! can drive any portal implementation the same way.

pub mod drcom;

pub use drcom::DrcomPortal;

use async_trait::async_trait;

use crate::models::LoginOutcome;

/// Interface for a captive-portal authenticator
#[async_trait]
pub trait Portal: Send + Sync {
    /// Returns the human-readable name of this portal type
    fn name(&self) -> &str;

    /// Run one authentication attempt with the given credentials
    ///
    /// Transport and protocol failures are folded into the outcome; network
    /// trouble never panics. One call, no retries, no cancellation.
    async fn login(&self, account: &str, password: &str) -> LoginOutcome;
}
