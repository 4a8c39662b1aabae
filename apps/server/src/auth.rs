//! API-key gate for the search endpoint.
//!
//! The production deployment checks keys against a shared cache; that
//! collaborator sits behind [`ApiKeyStore`] so the handlers never care
//! where the keys live.

use std::collections::HashSet;

use async_trait::async_trait;

/// Membership check consulted before serving a search request.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// True when the key is known.
    async fn exists(&self, key: &str) -> bool;
}

/// Key set loaded from config at startup. An empty set authorizes nobody.
pub struct StaticKeySet {
    keys: HashSet<String>,
}

impl StaticKeySet {
    /// Build the set from configured keys.
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ApiKeyStore for StaticKeySet {
    async fn exists(&self, key: &str) -> bool {
        !key.is_empty() && self.keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_key_is_authorized() {
        let store = StaticKeySet::new(["k1".to_string()]);
        assert!(store.exists("k1").await);
        assert!(!store.exists("k2").await);
    }

    #[tokio::test]
    async fn empty_key_is_never_authorized() {
        let store = StaticKeySet::new(["".to_string()]);
        assert!(!store.exists("").await);
    }
}
