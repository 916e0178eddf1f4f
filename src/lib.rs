mod api;
mod app;
mod cache;
mod components;
mod connectivity;
mod form;
mod i18n;
mod models;
mod notify;
mod pages;
mod state;
mod storage;
mod sync;
mod util;

use app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = wasm_tracing::set_as_global_default();
    mount_to_body(App);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::cache::OfflineCache;
    use crate::models::Todo;
    use crate::storage::{self, KeyValueStorage, TODOS_CACHE_KEY};
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn todos_survive_in_browser_storage() {
        let cache = OfflineCache::new(Rc::new(storage::LocalStorage));
        let todos = vec![Todo {
            id: Some(7),
            task: "Walk the dog".to_string(),
            ..Todo::default()
        }];
        cache.store(TODOS_CACHE_KEY, &todos);

        let reopened = OfflineCache::new(Rc::new(storage::LocalStorage));
        assert_eq!(reopened.get::<Vec<Todo>>(TODOS_CACHE_KEY), Some(todos));

        reopened.clear();
        assert!(storage::LocalStorage.get_item(storage::CACHE_NAMESPACE).is_none());
    }
}
