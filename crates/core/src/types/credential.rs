//! Login credentials.
//!
//! Passwords are held as [`SecretString`] so they never show up in `Debug`
//! output or tracing fields.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// An email/password pair submitted from a login or registration form.
///
/// The email is kept as entered. It is not parsed into an
/// [`Email`](crate::Email) because malformed input is the identity service's
/// to reject, and the administrator bypass compares the raw strings.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    /// Create credentials from form input.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// The email as entered.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The password, still wrapped.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }

    /// Whether these credentials are exactly `email` / `password`.
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password.expose_secret() == password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
