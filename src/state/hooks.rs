//! Reactive bindings between the sync core and the views.
//!
//! Each hook owns one synced view for the lifetime of the calling component:
//! it mounts on creation and tears down in `on_cleanup`, so no push message or
//! scheduled refresh reaches a view that is gone.

use super::{AppContext, AppState};
use crate::api::{ApiClient, PushEndpoint};
use crate::cache::OfflineCache;
use crate::form::{todo_fields, todo_form, FieldValue, FormBinder};
use crate::models::{Contact, Stats, Todo};
use crate::storage;
use crate::sync::{
    PushPolicy, StatsSource, StatsSync, SyncDeps, SyncPhase, SyncedView, TimerScheduler, TodoSync,
};
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;
use std::rc::Rc;

fn sync_deps(app: &AppState, push: Rc<dyn PushEndpoint>) -> SyncDeps {
    let notifications = app.notifications;
    SyncDeps {
        cache: OfflineCache::new(Rc::new(storage::LocalStorage)),
        connection: app.connection.get_value(),
        push,
        scheduler: Rc::new(TimerScheduler),
        notify: Rc::new(move |n| notifications.show(n)),
    }
}

#[derive(Clone, Copy)]
pub(crate) struct TodosHandle {
    pub items: RwSignal<Vec<Todo>>,
    pub phase: RwSignal<SyncPhase>,
    pub form: RwSignal<FormBinder<Todo>>,
    pub adding: RwSignal<bool>,
    sync: StoredValue<TodoSync<ApiClient>, LocalStorage>,
}

pub(crate) fn use_todos() -> TodosHandle {
    let app = expect_context::<AppContext>().0;

    let items = RwSignal::new(Vec::new());
    let phase = RwSignal::new(SyncPhase::Loading);
    let form = RwSignal::new(todo_form());
    let adding = RwSignal::new(true);

    let client = Rc::new(app.api_client.get_untracked());
    let deps = sync_deps(&app, client.clone());
    let sync = TodoSync::new(client, deps, move |todos: &Vec<Todo>, p| {
        items.try_set(todos.clone());
        phase.try_set(p);
    });
    let sync = StoredValue::new_local(sync);

    spawn_local(async move {
        if let Some(s) = sync.try_get_value() {
            s.mount().await;
        }
    });
    on_cleanup(move || {
        if let Some(s) = sync.try_get_value() {
            s.teardown();
        }
    });

    TodosHandle {
        items,
        phase,
        form,
        adding,
        sync,
    }
}

impl TodosHandle {
    pub fn offline(&self) -> bool {
        self.phase.get() == SyncPhase::OfflineCached
    }

    pub fn invalid(&self) -> bool {
        self.form.with(|f| f.invalid())
    }

    pub fn has_done(&self) -> bool {
        self.items.with(|todos| todos.iter().any(|t| t.done))
    }

    pub fn set_field(&self, name: &'static str, value: FieldValue) {
        self.form.update(|f| f.set_field(name, value));
    }

    pub fn assign(&self, contact: Option<Contact>) {
        self.set_field(todo_fields::ASSIGNED, FieldValue::Contact(contact));
    }

    /// Send the draft if it validates; otherwise only field errors appear.
    pub fn submit(&self) {
        let Some(Ok(todo)) = self.form.try_update(|f| f.submit(|t| t)) else {
            return;
        };
        let sync = self.sync;
        spawn_local(async move {
            if let Some(s) = sync.try_get_value() {
                s.submit(todo).await;
            }
        });
    }

    pub fn edit(&self, todo: Todo) {
        let Some(todo) = self.sync.try_with_value(|s| s.current(&todo)) else {
            return;
        };
        self.adding.set(false);
        self.form.update(|f| f.read(todo.clone()));
        let sync = self.sync;
        spawn_local(async move {
            if let Some(s) = sync.try_get_value() {
                s.edit(&todo).await;
            }
        });
    }

    pub fn add_new(&self) {
        self.sync.with_value(|s| s.add_new());
        self.adding.set(true);
        self.form.update(|f| f.clear());
    }

    pub fn remove(&self) {
        let sync = self.sync;
        spawn_local(async move {
            if let Some(s) = sync.try_get_value() {
                s.remove().await;
            }
        });
    }

    pub fn change_status(&self, todo: Todo, done: Option<bool>) {
        let sync = self.sync;
        spawn_local(async move {
            if let Some(s) = sync.try_get_value() {
                s.change_status(&todo, done).await;
            }
        });
    }
}

#[derive(Clone, Copy)]
pub(crate) struct StatsHandle {
    pub stats: RwSignal<Stats>,
    pub phase: RwSignal<SyncPhase>,
}

impl StatsHandle {
    pub fn offline(&self) -> bool {
        self.phase.get() == SyncPhase::OfflineCached
    }
}

pub(crate) fn use_stats() -> StatsHandle {
    let app = expect_context::<AppContext>().0;

    let stats = RwSignal::new(Stats::default());
    let phase = RwSignal::new(SyncPhase::Loading);

    let client = Rc::new(app.api_client.get_untracked());
    let deps = sync_deps(&app, client.clone());
    let view: StatsSync<ApiClient> = SyncedView::new(
        StatsSource(client),
        deps,
        PushPolicy::InfoOnly,
        move |s: &Stats, p| {
            stats.try_set(s.clone());
            phase.try_set(p);
        },
    );
    let view = StoredValue::new_local(view);

    spawn_local(async move {
        if let Some(v) = view.try_get_value() {
            v.mount().await;
        }
    });
    on_cleanup(move || {
        if let Some(v) = view.try_get_value() {
            v.teardown();
        }
    });

    StatsHandle { stats, phase }
}
