use std::{collections::HashMap, fmt, sync::Arc};

use tokio::sync::Mutex;

/// Session-scoped passwords, keyed by profile name.
///
/// Nothing in here is ever written anywhere. Cloning only bumps the
/// reference count, so every clone sees the same entries; create one per
/// application session and hand it to the [`ProfileStore`](super::store::ProfileStore).
#[derive(Clone, Default)]
pub struct SecretCache {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl SecretCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Option<String> {
        self.inner.lock().await.get(name).cloned()
    }

    pub async fn insert(&self, name: impl Into<String>, password: impl Into<String>) {
        self.inner.lock().await.insert(name.into(), password.into());
    }

    /// Returns `true` if a secret was cached for `name`.
    pub async fn remove(&self, name: &str) -> bool {
        self.inner.lock().await.remove(name).is_some()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.inner.lock().await.contains_key(name)
    }
}

impl fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Ok(map) => f
                .debug_struct("SecretCache")
                .field("names", &map.keys().collect::<Vec<_>>())
                .finish(),
            Err(_) => f.write_str("SecretCache { <locked> }"),
        }
    }
}
