//! Password sources
//!
//! The transparent store asks a [`PasswordSource`] for a password when the
//! cache has none. The CLI uses [`TerminalPrompt`] by default and
//! [`FixedPassword`] when a password is given by flag or environment.

use crate::crypto::SecureString;
use crate::error::{CmdbError, CmdbResult};

/// Something that can supply a password on demand
pub trait PasswordSource {
    /// Obtain a password; with `confirm`, it must be entered twice
    fn password(&self, confirm: bool) -> CmdbResult<SecureString>;

    /// Whether the password was given explicitly by the user
    ///
    /// An explicit password takes precedence over the cache.
    fn is_explicit(&self) -> bool {
        false
    }
}

impl<T: PasswordSource + ?Sized> PasswordSource for Box<T> {
    fn password(&self, confirm: bool) -> CmdbResult<SecureString> {
        (**self).password(confirm)
    }

    fn is_explicit(&self) -> bool {
        (**self).is_explicit()
    }
}

/// Masked password entry on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PasswordSource for TerminalPrompt {
    fn password(&self, confirm: bool) -> CmdbResult<SecureString> {
        read_confirmed(confirm, |prompt| {
            rpassword::prompt_password(prompt)
                .map(SecureString::from)
                .map_err(|e| CmdbError::Prompt(format!("Failed to read password: {}", e)))
        })
    }
}

/// A password known up front (command-line flag or environment)
#[derive(Debug, Clone)]
pub struct FixedPassword {
    password: SecureString,
}

impl FixedPassword {
    pub fn new(password: impl Into<SecureString>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl PasswordSource for FixedPassword {
    fn password(&self, _confirm: bool) -> CmdbResult<SecureString> {
        Ok(self.password.clone())
    }

    fn is_explicit(&self) -> bool {
        true
    }
}

/// Read a password, and when `confirm` is set read it again and compare
fn read_confirmed<F>(confirm: bool, mut read: F) -> CmdbResult<SecureString>
where
    F: FnMut(&str) -> CmdbResult<SecureString>,
{
    let password = read("Enter password for cmdb file: ")?;
    if confirm {
        let again = read("Confirm password: ")?;
        if password != again {
            return Err(CmdbError::Mismatch);
        }
    }
    Ok(password)
}
