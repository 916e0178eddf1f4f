use crate::storage::{KeyValueStorage, CACHE_NAMESPACE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::rc::Rc;

/// Last-known-good snapshots for offline display.
///
/// All keys live in one JSON object stored under the namespace key, so this
/// is not a real key/value store: every `store` rewrites the whole blob and
/// there is no per-key expiry. Nothing here is authoritative; it is
/// overwritten on each successful online fetch and read only while offline.
#[derive(Clone)]
pub(crate) struct OfflineCache {
    storage: Rc<dyn KeyValueStorage>,
    namespace: String,
}

impl OfflineCache {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self::with_namespace(storage, CACHE_NAMESPACE)
    }

    pub fn with_namespace(storage: Rc<dyn KeyValueStorage>, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    fn load(&self) -> Map<String, Value> {
        let Some(json) = self.storage.get_item(&self.namespace) else {
            return Map::new();
        };

        match serde_json::from_str::<Value>(&json) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::debug!(namespace = %self.namespace, "ignoring unreadable offline cache");
                Map::new()
            }
        }
    }

    pub fn store<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "offline cache: value is not serializable");
                return;
            }
        };

        let mut cache = self.load();
        cache.insert(key.to_string(), value);

        match serde_json::to_string(&cache) {
            Ok(json) => self.storage.set_item(&self.namespace, &json),
            Err(e) => tracing::warn!(key, error = %e, "offline cache: encode failed"),
        }
    }

    /// `None` when the key is absent or its value no longer decodes as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.load().remove(key)?;
        serde_json::from_value(value).ok()
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn clear(&self) {
        self.storage.remove_item(&self.namespace);
    }
}
