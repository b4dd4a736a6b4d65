//! Live tests for the HTTP identity client.
//!
//! These tests require:
//! - A reachable Appwrite-compatible identity service
//! - `APPWRITE_PROJECT_ID` (and optionally `APPWRITE_ENDPOINT`) in environment
//!
//! Run with: cargo test -p kabadiwala-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use uuid::Uuid;

use kabadiwala_core::{Credentials, SessionStatus};
use kabadiwala_storefront::config::StorefrontConfig;
use kabadiwala_storefront::identity::{AppwriteClient, IdentityProvider};
use kabadiwala_storefront::services::session::SessionStore;

fn client() -> AppwriteClient {
    let config = StorefrontConfig::from_env().expect("APPWRITE_PROJECT_ID must be set");
    AppwriteClient::new(&config.identity).unwrap()
}

/// A fresh address per run so repeated runs do not collide.
fn unique_email() -> String {
    format!("it-{}@kabadiwala.test", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "Requires a running Appwrite instance and APPWRITE_PROJECT_ID"]
async fn test_anonymous_client_has_no_account() {
    let err = client().current_account().await.unwrap_err();
    assert!(err.is_unauthorized(), "unexpected error: {err}");
}

#[tokio::test]
#[ignore = "Requires a running Appwrite instance and APPWRITE_PROJECT_ID"]
async fn test_bad_credentials_rejected() {
    let password = SecretString::from("definitely-wrong".to_string());
    let err = client()
        .create_session(&unique_email(), &password)
        .await
        .unwrap_err();
    assert!(err.is_unauthorized(), "unexpected error: {err}");
}

#[tokio::test]
#[ignore = "Requires a running Appwrite instance and APPWRITE_PROJECT_ID"]
async fn test_register_login_logout() {
    let store = SessionStore::initialize(client()).await;
    assert_eq!(store.status(), SessionStatus::Guest);

    let email = unique_email();
    let credentials = Credentials::new(email.clone(), "integration-pass-1");

    let user = store.register("Integration Test", &credentials).await.unwrap();
    assert_eq!(user.email.as_str(), email);
    assert!(store.is_authenticated());

    store.logout().await;
    assert_eq!(store.status(), SessionStatus::Guest);

    store.login(&credentials).await.unwrap();
    assert!(store.is_authenticated());
    store.logout().await;
}
