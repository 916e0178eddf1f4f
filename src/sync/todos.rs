use super::{PushPolicy, SnapshotEndpoint, SyncDeps, SyncPhase, SyncedView};
use crate::api::{ApiResult, TodoEndpoint};
use crate::models::{Message, Todo};
use crate::storage::TODOS_CACHE_KEY;
use std::cell::Cell;
use std::rc::Rc;

/// Whether a submitted draft is a new item or an edit of a listed one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum EditMode {
    #[default]
    Adding,
    Editing,
}

pub(crate) struct TodoSource<E>(pub Rc<E>);

impl<E: TodoEndpoint + 'static> SnapshotEndpoint for TodoSource<E> {
    type Snapshot = Vec<Todo>;

    const CACHE_KEY: &'static str = TODOS_CACHE_KEY;

    async fn fetch_snapshot(&self) -> ApiResult<Vec<Todo>> {
        self.0.find_all().await
    }
}

/// Replace the listed item whose id matches `item`'s.
///
/// An item without an id matches nothing, so it silently drops out of view.
pub(crate) fn replace_by_id(todos: &mut [Todo], id: Option<i64>, item: Todo) {
    if id.is_none() {
        return;
    }
    if let Some(slot) = todos.iter_mut().find(|t| t.id == id) {
        *slot = item;
    }
}

pub(crate) fn apply_saved(todos: &mut Vec<Todo>, saved: Todo, mode: EditMode) {
    match mode {
        EditMode::Adding => todos.push(saved),
        EditMode::Editing => {
            let id = saved.id;
            replace_by_id(todos, id, saved);
        }
    }
}

/// `(done, not_done)`, each in list order.
pub(crate) fn partition_done(todos: &[Todo]) -> (Vec<Todo>, Vec<Todo>) {
    todos.iter().cloned().partition(|t| t.done)
}

/// The item in `todos` sharing `todo`'s id; `todo` itself when there is none.
pub(crate) fn latest(todos: &[Todo], todo: &Todo) -> Todo {
    todo.id
        .and_then(|id| todos.iter().find(|t| t.id == Some(id)))
        .unwrap_or(todo)
        .clone()
}

pub(crate) fn with_status(todo: &Todo, done: Option<bool>) -> Todo {
    Todo {
        done: done.unwrap_or(false),
        ..todo.clone()
    }
}

/// The todo list view: a synced snapshot plus the mutation paths.
pub(crate) struct TodoSync<E: TodoEndpoint + 'static> {
    view: SyncedView<TodoSource<E>>,
    endpoint: Rc<E>,
    mode: Rc<Cell<EditMode>>,
}

impl<E: TodoEndpoint + 'static> Clone for TodoSync<E> {
    fn clone(&self) -> Self {
        Self {
            view: self.view.clone(),
            endpoint: self.endpoint.clone(),
            mode: self.mode.clone(),
        }
    }
}

impl<E: TodoEndpoint + 'static> TodoSync<E> {
    pub fn new(
        endpoint: Rc<E>,
        deps: SyncDeps,
        on_change: impl Fn(&Vec<Todo>, SyncPhase) + 'static,
    ) -> Self {
        let view = SyncedView::new(
            TodoSource(endpoint.clone()),
            deps,
            PushPolicy::AllMessages,
            on_change,
        );
        Self {
            view,
            endpoint,
            mode: Rc::new(Cell::new(EditMode::Adding)),
        }
    }

    pub fn view(&self) -> &SyncedView<TodoSource<E>> {
        &self.view
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.view.data()
    }

    pub fn mode(&self) -> EditMode {
        self.mode.get()
    }

    /// The listed version of `todo`, or `todo` itself when it is not listed.
    pub fn current(&self, todo: &Todo) -> Todo {
        latest(&self.view.data(), todo)
    }

    pub fn has_done(&self) -> bool {
        self.view.data().iter().any(|t| t.done)
    }

    pub async fn mount(&self) {
        self.view.mount().await
    }

    pub fn teardown(&self) {
        self.view.teardown()
    }

    /// Save a validated draft. Returns whether the server accepted it.
    pub async fn submit(&self, todo: Todo) -> bool {
        let mode = self.mode.get();
        match self.endpoint.save(&todo).await {
            Ok(Some(saved)) => {
                self.view.update_data(|todos| apply_saved(todos, saved, mode));
                true
            }
            Ok(None) => true,
            Err(e) => {
                self.view.fail("save todo", &e);
                false
            }
        }
    }

    /// Toggle one item. Local state changes only once the save resolves.
    ///
    /// Completions are applied in arrival order, so a slow save can
    /// overwrite a newer edit of the same item.
    pub async fn change_status(&self, todo: &Todo, done: Option<bool>) {
        let changed = with_status(&self.current(todo), done);
        match self.endpoint.save(&changed).await {
            Ok(saved) => {
                let saved = saved.unwrap_or(changed);
                let id = todo.id;
                self.view
                    .update_data(|todos| replace_by_id(todos, id, saved));
            }
            Err(e) => self.view.fail("change status", &e),
        }
    }

    /// Delete every done item in one call; keep the rest once it succeeds.
    pub async fn remove(&self) {
        let (done, not_done) = partition_done(&self.view.data());
        if done.is_empty() {
            return;
        }
        match self.endpoint.remove(&done).await {
            Ok(()) => self.view.set_data(not_done),
            Err(e) => self.view.fail("remove done todos", &e),
        }
    }

    /// Switch to editing `todo` and tell other clients about it.
    pub async fn edit(&self, todo: &Todo) {
        self.mode.set(EditMode::Editing);
        let push = self.view.deps().push.clone();
        if let Err(e) = push.send(Message::editing(todo)).await {
            tracing::warn!(error = %e, "could not announce edit");
        }
    }

    pub fn add_new(&self) {
        self.mode.set(EditMode::Adding);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::api::ApiError;
    use crate::connectivity::{ConnectionSource, ConnectionState};
    use crate::models::MessageType;
    use crate::notify::{Notification, Theme, SAVE_FAILED_TEXT};
    use crate::storage::KeyValueStorage;
    use crate::sync::{Activity, REFRESH_DELAY};
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::task::noop_waker_ref;
    use std::cell::RefCell;
    use std::future::Future;
    use std::task::Context;

    #[derive(Default)]
    struct FakeTodos {
        list: RefCell<Vec<Todo>>,
        find_calls: Cell<u32>,
        saved: RefCell<Vec<Todo>>,
        removed: RefCell<Vec<Vec<Todo>>>,
        save_reply: RefCell<Option<ApiResult<Option<Todo>>>>,
        remove_reply: RefCell<Option<ApiResult<()>>>,
        /// When set, `save` waits for it before replying.
        save_gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl TodoEndpoint for FakeTodos {
        async fn find_all(&self) -> ApiResult<Vec<Todo>> {
            self.find_calls.set(self.find_calls.get() + 1);
            Ok(self.list.borrow().clone())
        }

        async fn save(&self, todo: &Todo) -> ApiResult<Option<Todo>> {
            self.saved.borrow_mut().push(todo.clone());
            let gate = self.save_gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.save_reply
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Ok(Some(todo.clone())))
        }

        async fn remove(&self, todos: &[Todo]) -> ApiResult<()> {
            self.removed.borrow_mut().push(todos.to_vec());
            self.remove_reply.borrow_mut().take().unwrap_or(Ok(()))
        }
    }

    fn todo(id: i64, task: &str, done: bool) -> Todo {
        Todo {
            id: Some(id),
            task: task.to_string(),
            done,
            ..Default::default()
        }
    }

    fn mounted(h: &Harness, list: Vec<Todo>) -> (TodoSync<FakeTodos>, Rc<FakeTodos>) {
        let ep = Rc::new(FakeTodos::default());
        *ep.list.borrow_mut() = list;
        let sync = TodoSync::new(ep.clone(), h.deps(), |_, _| {});
        block_on(sync.mount());
        (sync, ep)
    }

    #[test]
    fn offline_mount_uses_cached_todos_without_endpoint_call() {
        let h = Harness::new();
        h.storage.set_item(
            crate::storage::CACHE_NAMESPACE,
            r#"{"todos":[{"id":1,"task":"Buy milk","done":false}]}"#,
        );
        h.connection.set_state(ConnectionState::ConnectionLost);

        let ep = Rc::new(FakeTodos::default());
        let sync = TodoSync::new(ep.clone(), h.deps(), |_, _| {});
        block_on(sync.mount());

        assert_eq!(sync.todos(), vec![todo(1, "Buy milk", false)]);
        assert_eq!(ep.find_calls.get(), 0);
        assert_eq!(sync.view().phase(), SyncPhase::OfflineCached);
    }

    #[test]
    fn submit_appends_when_adding() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", false)]);
        *ep.save_reply.borrow_mut() = Some(Ok(Some(todo(2, "b", false))));

        assert!(block_on(sync.submit(Todo {
            task: "b".to_string(),
            ..Default::default()
        })));

        assert_eq!(sync.todos(), vec![todo(1, "a", false), todo(2, "b", false)]);
    }

    #[test]
    fn submit_replaces_by_id_when_editing() {
        let h = Harness::new();
        let (sync, _) = mounted(&h, vec![todo(1, "a", false), todo(2, "b", false)]);
        block_on(sync.edit(&todo(2, "b", false)));
        assert_eq!(sync.mode(), EditMode::Editing);

        block_on(sync.submit(todo(2, "b2", false)));
        assert_eq!(sync.todos(), vec![todo(1, "a", false), todo(2, "b2", false)]);
    }

    #[test]
    fn editing_save_without_id_matches_nothing() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", false)]);
        block_on(sync.edit(&todo(1, "a", false)));
        *ep.save_reply.borrow_mut() = Some(Ok(Some(Todo {
            task: "lost".to_string(),
            ..Default::default()
        })));

        block_on(sync.submit(todo(1, "a", false)));
        assert_eq!(sync.todos(), vec![todo(1, "a", false)]);
    }

    #[test]
    fn edit_announces_itself() {
        let h = Harness::new();
        let (sync, _) = mounted(&h, vec![todo(4, "Walk the dog", false)]);
        block_on(sync.edit(&todo(4, "Walk the dog", false)));

        let sent = h.push.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id, 4);
        assert_eq!(sent[0].message_type, MessageType::Editing);
        assert_eq!(sent[0].data, "Some one is editing Walk the dog");

        drop(sent);
        sync.add_new();
        assert_eq!(sync.mode(), EditMode::Adding);
    }

    #[test]
    fn failed_validation_is_notified_and_state_kept() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", false)]);
        *ep.save_reply.borrow_mut() = Some(Err(ApiError::Validation {
            message: "Assignee 1 already has a todo!".to_string(),
        }));

        assert!(!block_on(sync.submit(todo(1, "a", false))));
        assert_eq!(sync.todos(), vec![todo(1, "a", false)]);
        assert_eq!(
            *h.notes.borrow(),
            vec![Notification::new("Assignee 1 already has a todo!", Theme::Error)]
        );
    }

    #[test]
    fn other_save_failures_are_generic() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![]);
        *ep.save_reply.borrow_mut() = Some(Err(ApiError::Http {
            status: 500,
            body: String::new(),
        }));
        block_on(sync.submit(todo(1, "a", false)));
        assert_eq!(
            *h.notes.borrow(),
            vec![Notification::new(SAVE_FAILED_TEXT, Theme::Error)]
        );
    }

    #[test]
    fn change_status_none_is_false() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", true), todo(2, "b", true)]);

        block_on(sync.change_status(&todo(1, "a", true), None));
        block_on(sync.change_status(&todo(2, "b", true), Some(false)));

        let saved = ep.saved.borrow();
        assert_eq!(saved[0].done, saved[1].done);
        assert!(!saved[0].done);
        assert_eq!(sync.todos(), vec![todo(1, "a", false), todo(2, "b", false)]);
    }

    #[test]
    fn change_status_falls_back_to_sent_copy() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", false)]);
        *ep.save_reply.borrow_mut() = Some(Ok(None));

        block_on(sync.change_status(&todo(1, "a", false), Some(true)));
        assert_eq!(sync.todos(), vec![todo(1, "a", true)]);
    }

    #[test]
    fn change_status_waits_for_the_save() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", false), todo(2, "b", false)]);
        let (release, gate) = oneshot::channel();
        *ep.save_gate.borrow_mut() = Some(gate);
        let from_server = Todo {
            description: "normalized".to_string(),
            ..todo(1, "a", true)
        };
        *ep.save_reply.borrow_mut() = Some(Ok(Some(from_server.clone())));

        let target = todo(1, "a", false);
        let mut pending = Box::pin(sync.change_status(&target, Some(true)));
        let mut cx = Context::from_waker(noop_waker_ref());
        assert!(pending.as_mut().poll(&mut cx).is_pending());

        assert_eq!(ep.saved.borrow().len(), 1);
        assert_eq!(sync.todos(), vec![todo(1, "a", false), todo(2, "b", false)]);

        release.send(()).expect("save is waiting");
        block_on(pending);
        assert_eq!(sync.todos(), vec![from_server, todo(2, "b", false)]);
    }

    #[test]
    fn change_status_sends_the_listed_version() {
        let h = Harness::new();
        let edited = Todo {
            description: "y".to_string(),
            priority: Some(4),
            ..todo(1, "a", false)
        };
        let (sync, ep) = mounted(&h, vec![edited.clone()]);
        let outdated = Todo {
            description: "x".to_string(),
            ..todo(1, "a", false)
        };

        block_on(sync.change_status(&outdated, Some(true)));

        let sent = ep.saved.borrow()[0].clone();
        assert_eq!(sent.description, "y");
        assert_eq!(sent.priority, Some(4));
        assert!(sent.done);
        assert_eq!(sync.todos(), vec![Todo { done: true, ..edited }]);
    }

    #[test]
    fn local_changes_reach_the_offline_cache() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", true)]);
        *ep.save_reply.borrow_mut() = Some(Ok(Some(todo(2, "b", false))));

        block_on(sync.submit(todo(0, "b", false)));
        assert_eq!(
            h.cache().get::<Vec<Todo>>(TODOS_CACHE_KEY),
            Some(vec![todo(1, "a", true), todo(2, "b", false)])
        );

        block_on(sync.remove());
        assert_eq!(
            h.cache().get::<Vec<Todo>>(TODOS_CACHE_KEY),
            Some(vec![todo(2, "b", false)])
        );

        // Going offline now shows the user's own changes.
        h.connection.set_state(ConnectionState::ConnectionLost);
        let (reopened, _) = mounted(&h, vec![]);
        assert_eq!(reopened.todos(), vec![todo(2, "b", false)]);
    }

    #[test]
    fn change_status_failure_leaves_list() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", false)]);
        *ep.save_reply.borrow_mut() = Some(Err(ApiError::Network("down".to_string())));

        block_on(sync.change_status(&todo(1, "a", false), Some(true)));
        assert_eq!(sync.todos(), vec![todo(1, "a", false)]);
        assert_eq!(h.connection.state(), ConnectionState::ConnectionLost);
    }

    #[test]
    fn remove_drops_done_and_keeps_the_rest() {
        let h = Harness::new();
        let list = vec![
            todo(1, "a", true),
            todo(2, "b", false),
            todo(3, "c", true),
            todo(4, "d", false),
        ];
        let (sync, ep) = mounted(&h, list);
        assert!(sync.has_done());

        block_on(sync.remove());

        assert_eq!(
            *ep.removed.borrow(),
            vec![vec![todo(1, "a", true), todo(3, "c", true)]]
        );
        assert_eq!(sync.todos(), vec![todo(2, "b", false), todo(4, "d", false)]);
        assert!(!sync.has_done());
    }

    #[test]
    fn failed_remove_keeps_list() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", true), todo(2, "b", false)]);
        *ep.remove_reply.borrow_mut() = Some(Err(ApiError::Http {
            status: 500,
            body: String::new(),
        }));

        block_on(sync.remove());
        assert_eq!(sync.todos().len(), 2);
        assert_eq!(h.notes.borrow().len(), 1);
    }

    #[test]
    fn remove_with_nothing_done_skips_the_call() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", false)]);
        block_on(sync.remove());
        assert!(ep.removed.borrow().is_empty());
    }

    #[test]
    fn info_push_refetches_editing_push_does_not() {
        let h = Harness::new();
        let (sync, ep) = mounted(&h, vec![todo(1, "a", false)]);
        assert_eq!(ep.find_calls.get(), 1);

        h.push.deliver(Message {
            id: 1,
            data: "Some one is editing a".to_string(),
            message_type: MessageType::Editing,
        });
        h.scheduler.advance(REFRESH_DELAY.as_millis() as u64 * 2);
        assert_eq!(ep.find_calls.get(), 1);
        assert_eq!(h.notes.borrow()[0].theme, Theme::Warning);

        ep.list.borrow_mut().push(todo(2, "b", false));
        h.push.deliver(Message {
            id: -1,
            data: "Todo: 2/b saved!".to_string(),
            message_type: MessageType::Info,
        });
        assert_eq!(h.notes.borrow()[1].theme, Theme::Success);
        assert_eq!(sync.view().phase(), SyncPhase::Online(Activity::Refreshing));

        h.scheduler.advance(REFRESH_DELAY.as_millis() as u64);
        assert_eq!(ep.find_calls.get(), 2);
        assert_eq!(sync.todos().len(), 2);
    }

    #[test]
    fn list_helpers() {
        let mut list = vec![todo(1, "a", false), todo(2, "b", false)];
        replace_by_id(&mut list, Some(3), todo(3, "c", false));
        assert_eq!(list.len(), 2);

        apply_saved(&mut list, todo(1, "a!", true), EditMode::Editing);
        assert_eq!(list[0], todo(1, "a!", true));

        let outdated = todo(1, "a", false);
        assert_eq!(latest(&list, &outdated), todo(1, "a!", true));
        assert_eq!(latest(&list, &todo(9, "z", false)), todo(9, "z", false));
        let draft = Todo::default();
        assert_eq!(latest(&list, &draft), draft);

        let (done, rest) = partition_done(&list);
        assert_eq!(done, vec![todo(1, "a!", true)]);
        assert_eq!(rest, vec![todo(2, "b", false)]);
    }
}
