//! Wire types for the identity service.

use serde::{Deserialize, Serialize};

use kabadiwala_core::{AccountId, Email};

use super::IdentityError;
use crate::models::session::CurrentUser;

/// Account record returned by `GET /account` and `POST /account`.
///
/// Only the fields the storefront reads are modelled; the service sends more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Service-assigned account ID.
    #[serde(rename = "$id")]
    pub id: String,
    /// Display name (may be empty).
    #[serde(default)]
    pub name: String,
    /// Account email.
    pub email: String,
    /// Phone number, empty when unset.
    #[serde(default)]
    pub phone: String,
}

impl TryFrom<Account> for CurrentUser {
    type Error = IdentityError;

    fn try_from(account: Account) -> Result<Self, Self::Error> {
        let email = Email::parse(&account.email)?;
        Ok(Self {
            account_id: Some(AccountId::new(account.id)),
            name: account.name,
            email,
            phone: Some(account.phone).filter(|p| !p.is_empty()),
        })
    }
}

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// HTTP-style status code echoed in the body.
    #[serde(default)]
    pub code: u16,
    /// Machine-readable error type, e.g. `user_invalid_credentials`.
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// Body of `POST /account/sessions/email`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /account`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateAccountRequest<'a> {
    pub user_id: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}
