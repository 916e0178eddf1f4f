use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub(crate) const CACHE_NAMESPACE: &str = "offline-cache";
pub(crate) const TODOS_CACHE_KEY: &str = "todos";
pub(crate) const STATS_CACHE_KEY: &str = "stats";

/// Set after a successful login; a 401 only forces a logout while this is set.
pub(crate) const LOGGED_IN_KEY: &str = "loggedIn";

/// Synchronous string key/value storage.
///
/// Writes are best effort: a full or unavailable store drops the write.
pub(crate) trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!(key, "localStorage write rejected");
            }
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Shared in-memory storage; clones see the same entries.
#[derive(Clone, Debug, Default)]
pub(crate) struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

pub(crate) fn is_logged_in(storage: &dyn KeyValueStorage) -> bool {
    storage
        .get_item(LOGGED_IN_KEY)
        .map(|v| v == "true")
        .unwrap_or(false)
}

pub(crate) fn set_logged_in(storage: &dyn KeyValueStorage) {
    storage.set_item(LOGGED_IN_KEY, "true");
}

pub(crate) fn clear_logged_in(storage: &dyn KeyValueStorage) {
    storage.remove_item(LOGGED_IN_KEY);
}
