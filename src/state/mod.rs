mod hooks;

pub(crate) use hooks::{use_stats, use_todos, TodosHandle};

use crate::api::{ApiClient, UserInfoService};
use crate::connectivity::{
    watch_browser_connectivity, ConnectionSource, ConnectionState, ConnectionStateStore,
};
use crate::i18n::Language;
use crate::models::UserInfo;
use crate::notify::{notification_for_connection, Notifications};
use crate::storage::{is_logged_in, set_logged_in};
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;
use leptos_dom::helpers::WindowListenerHandle;
use std::rc::Rc;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Shared by every synced view; lives on the UI thread only.
    pub connection: StoredValue<ConnectionStateStore, LocalStorage>,

    /// Mirror of `connection` for rendering.
    pub connection_state: RwSignal<ConnectionState>,

    pub notifications: Notifications,
    pub user_info: RwSignal<Option<UserInfo>>,
    pub logged_in: RwSignal<bool>,

    /// Date picker language for the todo form.
    pub language: RwSignal<Language>,

    _connectivity_handles: StoredValue<Option<(WindowListenerHandle, WindowListenerHandle)>>,
}

impl AppState {
    pub fn new() -> Self {
        let store = ConnectionStateStore::default();
        let handles = watch_browser_connectivity(&store);

        let notifications = Notifications::new();
        let connection_state = RwSignal::new(store.state());
        store.add_listener(Rc::new(move |s| {
            connection_state.try_set(s);
            if let Some(n) = notification_for_connection(s) {
                notifications.show(n);
            }
        }));

        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            connection: StoredValue::new_local(store),
            connection_state,
            notifications,
            user_info: RwSignal::new(None),
            logged_in: RwSignal::new(is_logged_in(&crate::storage::LocalStorage)),
            language: RwSignal::new(Language::Fi),
            _connectivity_handles: StoredValue::new(Some(handles)),
        }
    }

    /// Fetch the signed-in user, once per session.
    pub fn load_user_info(&self) {
        if self.user_info.get_untracked().is_some() {
            return;
        }
        let client = self.api_client.get_untracked();
        let user_info = self.user_info;
        let logged_in = self.logged_in;
        spawn_local(async move {
            match client.get_user_info().await {
                Ok(info) => {
                    set_logged_in(&crate::storage::LocalStorage);
                    logged_in.set(true);
                    user_info.set(Some(info));
                }
                Err(e) => tracing::warn!(error = %e, "could not load user info"),
            }
        });
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.user_info
            .with(|u| u.as_ref().is_some_and(|u| u.has_role(role)))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
