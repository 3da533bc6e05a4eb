//! Credential wrapper with automatic memory zeroization.

use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// A string holding secret material (API keys, client secrets, session
/// tokens). The backing memory is zeroized when the value is dropped,
/// and `Debug`/`Display` never reveal the contents.
#[derive(Clone)]
pub struct SecureString(Zeroizing<String>);

impl SecureString {
    pub fn new(s: String) -> Self {
        Self(Zeroizing::new(s))
    }

    /// Exposes the secret for use. Avoid copying the returned slice;
    /// copies are not zeroized.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl Default for SecureString {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureString([REDACTED])")
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        // Constant-time comparison to avoid leaking secret length prefixes
        use subtle::ConstantTimeEq;
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for SecureString {}

impl Drop for SecureString {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expose_secret() {
        let secret = SecureString::new("client-secret-123".to_string());
        assert_eq!(secret.expose_secret(), "client-secret-123");
    }

    #[test]
    fn test_debug_and_display_redacted() {
        let secret = SecureString::from("super-secret");
        assert!(!format!("{:?}", secret).contains("super-secret"));
        assert!(!format!("{}", secret).contains("super-secret"));
    }

    #[test]
    fn test_equality() {
        assert_eq!(SecureString::from("a"), SecureString::from("a"));
        assert_ne!(SecureString::from("a"), SecureString::from("b"));
    }

    #[test]
    fn test_default_is_empty() {
        assert!(SecureString::default().is_empty());
    }
}
