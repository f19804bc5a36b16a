//! Credential handling for backend tokens
//!
//! Tokens are wrapped in [`secrecy::Secret`], which zeroes memory on drop,
//! redacts `Debug` output and requires an explicit `expose_secret()` call.
//!
//! ```rust
//! use reportflow::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("bearer-token".to_string());
//! assert_eq!(token.expose_secret().as_ref(), "bearer-token");
//! assert!(!format!("{token:?}").contains("bearer-token"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload of a secret, zeroized on drop
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string used for bearer tokens in configuration
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-token".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-token"));
    }

    #[test]
    fn test_secret_serde_roundtrip_through_config() {
        #[derive(Serialize, Deserialize)]
        struct Section {
            token: Option<SecretString>,
        }

        let section: Section = toml::from_str("token = \"abc123\"").unwrap();
        let token = section.token.unwrap();
        assert_eq!(token.expose_secret().as_ref(), "abc123");
        assert!(!token.expose_secret().is_empty());
    }
}
