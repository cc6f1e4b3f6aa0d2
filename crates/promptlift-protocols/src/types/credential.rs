//! API credential type.

use std::fmt;

/// Storage key under which the credential is persisted.
pub const CREDENTIAL_KEY: &str = "geminiApiKey";

/// An opaque API key for the generation service.
///
/// `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Build a credential from user input. Returns `None` for blank input.
    pub fn new(key: impl AsRef<str>) -> Option<Self> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    /// The raw key, for placing on the wire.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short masked form suitable for logs and CLI output.
    pub fn masked(&self) -> String {
        let count = self.0.chars().count();
        if count <= 8 {
            return "****".to_string();
        }
        let tail: String = self.0.chars().skip(count - 4).collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}
