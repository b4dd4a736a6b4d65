//! In-process identity provider.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use secrecy::{ExposeSecret, SecretString};

use super::types::Account;
use super::{IdentityError, IdentityProvider};

/// Minimum password length accepted by `create_account`, matching the hosted
/// service.
const MIN_PASSWORD_LENGTH: usize = 8;

/// An identity provider that keeps accounts and the current session in
/// memory.
///
/// Mirrors the hosted service's observable behavior closely enough to run the
/// storefront without network access: 401 for bad credentials or a missing
/// session, 409 for a duplicate email, 400 for a short password.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    directory: Mutex<Directory>,
}

#[derive(Debug, Default)]
struct Directory {
    /// Accounts keyed by email.
    accounts: HashMap<String, StoredAccount>,
    /// Email of the signed-in account.
    current: Option<String>,
}

#[derive(Debug)]
struct StoredAccount {
    account: Account,
    password: SecretString,
}

impl InMemoryIdentityProvider {
    /// Create a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account up front, replacing any existing one with the same email.
    #[must_use]
    pub fn with_account(self, id: &str, name: &str, email: &str, password: &str) -> Self {
        if let Ok(mut directory) = self.directory.lock() {
            directory.accounts.insert(
                email.to_string(),
                StoredAccount {
                    account: Account {
                        id: id.to_string(),
                        name: name.to_string(),
                        email: email.to_string(),
                        phone: String::new(),
                    },
                    password: SecretString::from(password.to_string()),
                },
            );
        }
        self
    }

    /// Email of the account with an active session, if any.
    #[must_use]
    pub fn current_email(&self) -> Option<String> {
        self.directory.lock().ok().and_then(|d| d.current.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Directory>, IdentityError> {
        self.directory
            .lock()
            .map_err(|_| IdentityError::api(500, "general_unknown", "directory lock poisoned"))
    }
}

fn no_session() -> IdentityError {
    IdentityError::api(
        401,
        "general_unauthorized_scope",
        "User (role: guests) missing scope (account)",
    )
}

impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_session(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), IdentityError> {
        let mut directory = self.lock()?;

        let valid = directory
            .accounts
            .get(email)
            .is_some_and(|stored| stored.password.expose_secret() == password.expose_secret());
        if !valid {
            return Err(IdentityError::api(
                401,
                "user_invalid_credentials",
                "Invalid credentials. Please check the email and password.",
            ));
        }

        directory.current = Some(email.to_string());
        Ok(())
    }

    async fn current_account(&self) -> Result<Account, IdentityError> {
        let directory = self.lock()?;
        directory
            .current
            .as_ref()
            .and_then(|email| directory.accounts.get(email))
            .map(|stored| stored.account.clone())
            .ok_or_else(no_session)
    }

    async fn delete_session(&self) -> Result<(), IdentityError> {
        let mut directory = self.lock()?;
        directory.current.take().map(|_| ()).ok_or_else(no_session)
    }

    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &SecretString,
        name: &str,
    ) -> Result<Account, IdentityError> {
        if password.expose_secret().len() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::api(
                400,
                "general_argument_invalid",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }

        let mut directory = self.lock()?;
        if directory.accounts.contains_key(email) {
            return Err(IdentityError::api(
                409,
                "user_already_exists",
                "A user with the same id, email, or phone already exists in this project.",
            ));
        }

        let account = Account {
            id: account_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: String::new(),
        };
        directory.accounts.insert(
            email.to_string(),
            StoredAccount {
                account: account.clone(),
                password: password.clone(),
            },
        );
        Ok(account)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let provider = InMemoryIdentityProvider::new().with_account(
            "acc-1",
            "Ravi",
            "ravi@kabadiwala.com",
            "scrap-dealer",
        );

        assert!(provider.current_account().await.unwrap_err().is_unauthorized());

        provider
            .create_session("ravi@kabadiwala.com", &secret("scrap-dealer"))
            .await
            .unwrap();
        assert_eq!(provider.current_account().await.unwrap().id, "acc-1");

        provider.delete_session().await.unwrap();
        assert!(provider.current_email().is_none());
        assert!(provider.delete_session().await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let provider = InMemoryIdentityProvider::new().with_account(
            "acc-1",
            "Ravi",
            "ravi@kabadiwala.com",
            "scrap-dealer",
        );

        let err = provider
            .create_session("ravi@kabadiwala.com", &secret("wrong-password"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(provider.current_email().is_none());
    }

    #[tokio::test]
    async fn test_create_account_rules() {
        let provider = InMemoryIdentityProvider::new();

        let err = provider
            .create_account("a1", "meena@kabadiwala.com", &secret("short"), "Meena")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Api { status: 400, .. }));

        let account = provider
            .create_account("a1", "meena@kabadiwala.com", &secret("long-enough"), "Meena")
            .await
            .unwrap();
        assert_eq!(account.name, "Meena");
        // Creating an account does not sign in.
        assert!(provider.current_email().is_none());

        let err = provider
            .create_account("a2", "meena@kabadiwala.com", &secret("long-enough"), "Meena")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Api { status: 409, .. }));
    }
}
