use std::collections::BTreeMap;

use zeroize::Zeroizing;

/// Decrypted credential material: a string map whose values are zeroized on
/// drop and never `Debug`-printable.
///
/// Well-known keys are `token`, `username`, `password`, `api_key`,
/// `key_name`, and `access_token`, depending on the auth kind.
#[derive(Clone, Default)]
pub struct SecretMap(BTreeMap<String, Zeroizing<String>>);

impl SecretMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Zeroizing::new(v.into())))
                .collect(),
        )
    }

    pub fn insert(&mut self, key: impl Into<String>, value: String) {
        self.0.insert(key.into(), Zeroizing::new(value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.as_str())
    }

    /// Lookup with a fallback, mirroring `dict.get(key, default)` access to
    /// the decrypted payload.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretMap(<redacted>)")
    }
}
