//! Secure memory handling for passwords
//!
//! Passwords travel from the prompt or the cache into key derivation as a
//! [`SecureString`], which wipes its buffer on drop and never prints its
//! contents.

use std::fmt;
use std::ops::Deref;

use zeroize::Zeroizing;

/// A string type that zeros its contents on drop
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString {
    inner: Zeroizing<String>,
}

impl SecureString {
    /// Create a new SecureString
    pub fn new(s: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(s.into()),
        }
    }

    /// Get the string contents
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl Deref for SecureString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<str> for SecureString {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("len", &self.inner.len())
            .finish()
    }
}

// Don't print the contents in Display output
impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_access() {
        let s = SecureString::new("pw123");
        assert_eq!(s.as_str(), "pw123");
        assert_eq!(&*s, "pw123");
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn test_secure_string_redacted() {
        let s = SecureString::new("pw123");
        assert!(!format!("{:?}", s).contains("pw123"));
        assert_eq!(format!("{}", s), "[REDACTED 5 bytes]");
    }
}
