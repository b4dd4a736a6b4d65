//! Session-related types.
//!
//! What the session store publishes to observers: the signed-in identity (if
//! any) plus the loading and error flags of the most recent call.

use serde::{Deserialize, Serialize};

use kabadiwala_core::{AccountId, Email, SessionStatus};

/// Signed-in user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Account ID from the identity service. `None` for the built-in
    /// administrator, which never touches the service.
    pub account_id: Option<AccountId>,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Phone number on the account, if one was set.
    pub phone: Option<String>,
}

/// Authentication state of a session store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The startup check has not finished.
    #[default]
    Unknown,
    /// Nobody is signed in.
    Guest,
    /// A user is signed in.
    Authenticated(CurrentUser),
}

impl SessionState {
    /// The status without the identity payload.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        match self {
            Self::Unknown => SessionStatus::Unknown,
            Self::Guest => SessionStatus::Guest,
            Self::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Unknown | Self::Guest => None,
        }
    }
}

/// Everything an observer of the session store sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current authentication state.
    pub state: SessionState,
    /// Whether a call to the identity service is in flight.
    pub loading: bool,
    /// Message from the last failed login or registration.
    pub error: Option<String>,
}

impl Default for SessionSnapshot {
    /// A store that has not run its startup check yet is loading.
    fn default() -> Self {
        Self {
            state: SessionState::Unknown,
            loading: true,
            error: None,
        }
    }
}
