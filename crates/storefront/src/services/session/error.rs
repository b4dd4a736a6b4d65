//! Session error types.
//!
//! The display strings are shown to the user as-is next to the form that
//! triggered them, so they carry no detail about the underlying failure.

use thiserror::Error;

/// Errors surfaced by login and registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Login was rejected, or the identity service could not be reached.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account creation or the follow-up login failed.
    #[error("Registration failed. Please try again.")]
    RegistrationFailed,
}
