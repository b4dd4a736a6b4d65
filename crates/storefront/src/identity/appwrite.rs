//! Appwrite-compatible REST client for the identity service.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use super::types::{Account, ApiErrorBody, CreateAccountRequest, CreateSessionRequest};
use super::{IdentityError, IdentityProvider};
use crate::config::IdentityServiceConfig;

/// Identity service client.
///
/// Holds one cookie store, so one client is one signed-in browser: the
/// session created by [`create_session`](IdentityProvider::create_session) is
/// the "current" session for every later call on the same client.
#[derive(Clone)]
pub struct AppwriteClient {
    client: reqwest::Client,
    base_url: String,
}

impl AppwriteClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the project ID is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &IdentityServiceConfig) -> Result<Self, IdentityError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "X-Appwrite-Project",
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| IdentityError::Config(format!("Invalid project ID: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.endpoint.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl IdentityProvider for AppwriteClient {
    async fn create_session(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), IdentityError> {
        tracing::debug!(email, "Creating identity session");

        let body = CreateSessionRequest {
            email,
            password: password.expose_secret(),
        };
        let response = self
            .client
            .post(self.url("/account/sessions/email"))
            .json(&body)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn current_account(&self) -> Result<Account, IdentityError> {
        let response = self.client.get(self.url("/account")).send().await?;
        let response = ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }

    async fn delete_session(&self) -> Result<(), IdentityError> {
        let response = self
            .client
            .delete(self.url("/account/sessions/current"))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &SecretString,
        name: &str,
    ) -> Result<Account, IdentityError> {
        tracing::debug!(account_id, email, "Creating identity account");

        let body = CreateAccountRequest {
            user_id: account_id,
            email,
            password: password.expose_secret(),
            name,
        };
        let response = self
            .client
            .post(self.url("/account"))
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }
}

/// Turn a non-2xx response into [`IdentityError::Api`].
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, IdentityError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body))
}

/// Build an API error from a status and raw body, falling back to the raw
/// body as the message when it is not a structured error.
fn api_error(status: u16, body: &str) -> IdentityError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => IdentityError::api(status, parsed.kind, parsed.message),
        Err(_) => IdentityError::api(status, "unknown", body.trim()),
    }
}
