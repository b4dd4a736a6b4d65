//! Profile fields kept alongside the account.
//!
//! The identity service only knows name, email and phone. Address, postal
//! code and picture live in local storage as free-form strings with no schema.

use chrono::{Local, Timelike};
use thiserror::Error;

use crate::models::session::CurrentUser;
use crate::storage::{Storage, StorageError, StorageKey, keys};

/// Longest phone number accepted.
const MAX_PHONE_DIGITS: usize = 10;

/// Errors from profile updates.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Phone number was not 0-10 digits.
    #[error("Phone number should be numeric and maximum 10 digits.")]
    InvalidPhoneNumber,

    /// Persisting the field failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Read/write access to the stored profile fields.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    storage: Storage,
}

impl ProfileStore {
    /// Create a profile store over `storage`.
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Stored phone number, else the account's phone, else empty.
    ///
    /// A cleared (empty) stored number falls back to the account's phone.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if the stored value cannot be read.
    pub fn phone_number(&self, user: Option<&CurrentUser>) -> Result<String, ProfileError> {
        Ok(self
            .read(keys::PHONE_NUMBER)?
            .or_else(|| user.and_then(|u| u.phone.clone()))
            .unwrap_or_default())
    }

    /// Store a phone number. Accepts up to ten ASCII digits (empty clears it).
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhoneNumber` for anything else, leaving the stored
    /// value untouched, or `Storage` if it cannot be saved.
    pub fn set_phone_number(&self, phone: &str) -> Result<(), ProfileError> {
        if phone.len() > MAX_PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProfileError::InvalidPhoneNumber);
        }
        self.write(keys::PHONE_NUMBER, phone)
    }

    /// Stored street address, or empty.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if the stored value cannot be read.
    pub fn address(&self) -> Result<String, ProfileError> {
        Ok(self.read(keys::ADDRESS)?.unwrap_or_default())
    }

    /// Store the street address as entered.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if it cannot be saved.
    pub fn set_address(&self, address: &str) -> Result<(), ProfileError> {
        self.write(keys::ADDRESS, address)
    }

    /// Stored postal code, or empty.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if the stored value cannot be read.
    pub fn postal_code(&self) -> Result<String, ProfileError> {
        Ok(self.read(keys::POSTAL_CODE)?.unwrap_or_default())
    }

    /// Store the postal code as entered.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if it cannot be saved.
    pub fn set_postal_code(&self, postal_code: &str) -> Result<(), ProfileError> {
        self.write(keys::POSTAL_CODE, postal_code)
    }

    /// Stored profile picture reference, if one was uploaded.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if the stored value cannot be read.
    pub fn profile_picture(&self) -> Result<Option<String>, ProfileError> {
        self.read(keys::PROFILE_PICTURE)
    }

    /// Store a profile picture reference (URL or data URL).
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if it cannot be saved.
    pub fn set_profile_picture(&self, picture: &str) -> Result<(), ProfileError> {
        self.write(keys::PROFILE_PICTURE, picture)
    }

    /// An empty stored value counts as unset.
    fn read(&self, key: StorageKey<String>) -> Result<Option<String>, ProfileError> {
        Ok(self.storage.read(key)?.filter(|value| !value.is_empty()))
    }

    fn write(&self, key: StorageKey<String>, value: &str) -> Result<(), ProfileError> {
        self.storage.write(key, &value.to_string())?;
        Ok(())
    }
}

/// Greeting for the given hour of the day (0-23).
#[must_use]
pub const fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good Morning",
        12..=16 => "Good Afternoon",
        _ => "Good Evening",
    }
}

/// Greeting for the current local time.
#[must_use]
pub fn greeting_now() -> &'static str {
    greeting(Local::now().hour())
}
