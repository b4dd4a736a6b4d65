//! Application state wiring the stores together.

use std::sync::Arc;

use kabadiwala_core::{CurrencyCode, Price};

use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::identity::{AppwriteClient, IdentityProvider};
use crate::models::product::{NewProduct, Product};
use crate::services::cart::{CartLine, CartStore, CheckoutReceipt};
use crate::services::catalog::Catalog;
use crate::services::profile::{ProfileStore, greeting_now};
use crate::services::session::SessionStore;
use crate::storage::Storage;

/// Application state for one storefront user.
///
/// Owns the catalog, the cart and the profile store over one shared
/// [`Storage`]. The session store sits behind an `Arc` so observers and
/// background tasks can hold on to it independently.
pub struct App<P = AppwriteClient> {
    storage: Storage,
    catalog: Catalog,
    cart: CartStore,
    profile: ProfileStore,
    session: Arc<SessionStore<P>>,
}

impl App<AppwriteClient> {
    /// Build the application from configuration.
    ///
    /// Opens the JSON file store when `storage_path` is set, otherwise keeps
    /// state in memory, then runs the startup session check.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be opened, the stored catalog or
    /// cart cannot be read, or the identity client cannot be built.
    pub async fn bootstrap(config: &StorefrontConfig) -> Result<Self> {
        let storage = match &config.storage_path {
            Some(path) => Storage::open(path)?,
            None => Storage::in_memory(),
        };
        let provider = AppwriteClient::new(&config.identity)?;

        let app = Self::with_provider(storage, provider).await?;
        tracing::info!(
            products = app.catalog.len(),
            session = %app.session.status(),
            persistent = config.storage_path.is_some(),
            "Storefront ready"
        );
        Ok(app)
    }
}

impl<P: IdentityProvider> App<P> {
    /// Build the application over an existing storage and identity provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored catalog or cart cannot be read.
    pub async fn with_provider(storage: Storage, provider: P) -> Result<Self> {
        let catalog = Catalog::load(storage.clone())?;
        let cart = CartStore::load(storage.clone())?;
        let profile = ProfileStore::new(storage.clone());
        let session = Arc::new(SessionStore::initialize(provider).await);

        Ok(Self {
            storage,
            catalog,
            cart,
            profile,
            session,
        })
    }

    /// Get a reference to the shared storage handle.
    #[must_use]
    pub const fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get a reference to the cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Get a mutable reference to the cart.
    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Get a reference to the profile store.
    #[must_use]
    pub const fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    /// Get a reference to the session store.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore<P>> {
        &self.session
    }

    /// Add a product uploaded through the sell form.
    ///
    /// # Errors
    ///
    /// Returns an error if the form input is invalid or cannot be saved.
    pub fn add_product(&mut self, new_product: NewProduct) -> Result<Product> {
        Ok(self.catalog.add_product(new_product)?)
    }

    /// Cart total priced against the current catalog.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        Price::new(self.cart.total(&self.catalog), CurrencyCode::default())
    }

    /// Cart lines for rendering, in catalog order.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart.lines(&self.catalog)
    }

    /// Check out the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty, already checked out, or the
    /// emptied cart cannot be saved.
    pub fn checkout(&mut self) -> Result<CheckoutReceipt> {
        Ok(self.cart.checkout(&self.catalog)?)
    }

    /// Phone number for the profile page, falling back to the account's.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value cannot be read.
    pub fn phone_number(&self) -> Result<String> {
        let user = self.session.current_user();
        Ok(self.profile.phone_number(user.as_ref())?)
    }

    /// Time-of-day greeting, with the user's name when signed in.
    #[must_use]
    pub fn greeting(&self) -> String {
        match self.session.current_user() {
            Some(user) => format!("{}, {}", greeting_now(), user.name),
            None => greeting_now().to_string(),
        }
    }
}
