//! Status enums for the storefront state machines.

use serde::{Deserialize, Serialize};

/// Lifecycle of a cart.
///
/// `CheckedOut` is terminal for a given cart; starting a new cart returns to
/// `Shopping` with no lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Lines may be added, removed and adjusted.
    #[default]
    Shopping,
    /// Checkout completed; the cart no longer accepts changes.
    CheckedOut,
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shopping => write!(f, "shopping"),
            Self::CheckedOut => write!(f, "checked_out"),
        }
    }
}

/// Coarse session status, without the identity payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The startup check has not completed yet.
    #[default]
    Unknown,
    /// No authenticated identity.
    Guest,
    /// An identity is signed in.
    Authenticated,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Guest => write!(f, "guest"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}
