//! Integration tests for the Kabadiwala.com storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline suites (in-memory identity provider, temp-file storage)
//! cargo test -p kabadiwala-integration-tests
//!
//! # Live suite against a real identity service
//! APPWRITE_PROJECT_ID=... cargo test -p kabadiwala-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_flow` - Catalog, cart and profile persistence across restarts
//! - `session_flow` - Login, registration and logout through the session store
//! - `appwrite_live` - The HTTP identity client against a running service

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use kabadiwala_storefront::identity::InMemoryIdentityProvider;
use kabadiwala_storefront::state::App;
use kabadiwala_storefront::storage::{Storage, StorageError};

/// Account ID of the seeded buyer.
pub const BUYER_ID: &str = "64f1c0ffee00";
/// Display name of the seeded buyer.
pub const BUYER_NAME: &str = "Asha Verma";
/// Email of the seeded buyer.
pub const BUYER_EMAIL: &str = "asha@kabadiwala.com";
/// Password of the seeded buyer.
pub const BUYER_PASSWORD: &str = "recycle-more";

/// An identity provider holding one buyer account and no session.
#[must_use]
pub fn seeded_provider() -> Arc<InMemoryIdentityProvider> {
    Arc::new(InMemoryIdentityProvider::new().with_account(
        BUYER_ID,
        BUYER_NAME,
        BUYER_EMAIL,
        BUYER_PASSWORD,
    ))
}

/// A storage file in a temporary directory that outlives individual
/// [`Storage`] handles, so tests can simulate a restart by reopening it.
pub struct TempStore {
    dir: TempDir,
}

impl TempStore {
    /// Create an empty temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Path of the storage file (created on first write).
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("state").join("kabadiwala.json")
    }

    /// Open a fresh handle on the storage file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn open(&self) -> Result<Storage, StorageError> {
        Storage::open(self.path())
    }

    /// Start the application over this storage file.
    ///
    /// # Errors
    ///
    /// Returns an error if stored state cannot be read.
    pub async fn start(
        &self,
        provider: Arc<InMemoryIdentityProvider>,
    ) -> kabadiwala_storefront::error::Result<App<Arc<InMemoryIdentityProvider>>> {
        let storage = self.open()?;
        App::with_provider(storage, provider).await
    }
}
