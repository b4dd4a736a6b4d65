//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for bootstrapping and for callers that
//! drive several stores at once, plus the Sentry scope helpers the services use
//! to attach user context and breadcrumbs to captured events.

use thiserror::Error;

use crate::config::ConfigError;
use crate::identity::IdentityError;
use crate::models::session::CurrentUser;
use crate::services::cart::CartError;
use crate::services::catalog::CatalogError;
use crate::services::profile::ProfileError;
use crate::services::session::SessionError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage could not be opened or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Identity service client failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Login or registration failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Profile update was rejected.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

impl AppError {
    /// Message safe to show next to the form that triggered the error.
    ///
    /// Session and profile messages are already user-facing; everything else
    /// is collapsed so internal details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Session(err) => err.to_string(),
            Self::Profile(ProfileError::InvalidPhoneNumber) => {
                ProfileError::InvalidPhoneNumber.to_string()
            }
            Self::Catalog(err @ (CatalogError::MissingName | CatalogError::InvalidPrice(_))) => {
                err.to_string()
            }
            Self::Cart(CartError::Empty) => "Your cart is empty".to_string(),
            Self::Cart(CartError::CheckedOut) => "This order has already been placed".to_string(),
            Self::Identity(_) => "Could not reach the account service".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the signed-in user.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user: &CurrentUser) {
    let id = user
        .account_id
        .as_ref()
        .map_or_else(|| user.email.to_string(), ToString::to_string);
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(id),
            email: Some(user.email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Capture an unexpected identity service failure to Sentry and log it.
pub fn capture_remote_failure(context: &str, error: &IdentityError) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        error = %error,
        context,
        sentry_event_id = %event_id,
        "Identity service error"
    );
}
