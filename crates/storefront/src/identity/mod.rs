//! Remote identity service.
//!
//! # Architecture
//!
//! - [`IdentityProvider`] is the contract the session store consumes: create a
//!   session, fetch the current account, delete the current session, create
//!   an account. The service is opaque; no local user table exists.
//! - [`AppwriteClient`] speaks the Appwrite-compatible REST API over
//!   `reqwest`, keeping the session cookie in the client's cookie store.
//! - [`InMemoryIdentityProvider`] implements the same contract in-process for
//!   local development and tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use kabadiwala_storefront::identity::{AppwriteClient, IdentityProvider};
//!
//! let client = AppwriteClient::new(&config.identity)?;
//! client.create_session("seller@kabadiwala.com", &password).await?;
//! let account = client.current_account().await?;
//! ```

mod appwrite;
mod memory;
pub mod types;

use std::future::Future;
use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;

pub use appwrite::AppwriteClient;
pub use memory::InMemoryIdentityProvider;
pub use types::{Account, ApiErrorBody};

/// Errors that can occur when talking to the identity service.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error response.
    #[error("API error: {status} {kind} - {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    /// The account record could not be turned into a user identity.
    #[error("invalid account record: {0}")]
    InvalidAccount(#[from] kabadiwala_core::EmailError),

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The client could not be configured.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl IdentityError {
    /// Build an API error from its parts.
    pub fn api(status: u16, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Whether the service rejected the request for lack of a valid session
    /// or valid credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

/// Operations the storefront needs from the identity service.
///
/// Every call is a single request with no retries. The service tracks which
/// session is "current" for this client, so `current_account` and
/// `delete_session` take no session argument.
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password, making the new session current.
    fn create_session(
        &self,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<(), IdentityError>> + Send;

    /// Fetch the account behind the current session.
    ///
    /// Fails (usually with a 401 [`IdentityError::Api`]) when there is no
    /// valid session.
    fn current_account(&self) -> impl Future<Output = Result<Account, IdentityError>> + Send;

    /// Delete the current session.
    fn delete_session(&self) -> impl Future<Output = Result<(), IdentityError>> + Send;

    /// Create an account. Does not sign in.
    fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &SecretString,
        name: &str,
    ) -> impl Future<Output = Result<Account, IdentityError>> + Send;
}

impl<P: IdentityProvider> IdentityProvider for Arc<P> {
    fn create_session(
        &self,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<(), IdentityError>> + Send {
        (**self).create_session(email, password)
    }

    fn current_account(&self) -> impl Future<Output = Result<Account, IdentityError>> + Send {
        (**self).current_account()
    }

    fn delete_session(&self) -> impl Future<Output = Result<(), IdentityError>> + Send {
        (**self).delete_session()
    }

    fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &SecretString,
        name: &str,
    ) -> impl Future<Output = Result<Account, IdentityError>> + Send {
        (**self).create_account(account_id, email, password, name)
    }
}
