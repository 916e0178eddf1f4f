use crate::api::{ApiError, ApiErrorKind};
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strum::Display;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
pub(crate) enum ConnectionState {
    #[default]
    Connected,
    Loading,
    Reconnecting,
    ConnectionLost,
}

impl ConnectionState {
    pub fn is_offline(self) -> bool {
        self == ConnectionState::ConnectionLost
    }
}

pub(crate) type ListenerId = u64;
pub(crate) type StateListener = Rc<dyn Fn(ConnectionState)>;

/// Something that knows the connection state and tells listeners when it moves.
pub(crate) trait ConnectionSource {
    fn state(&self) -> ConnectionState;
    fn add_listener(&self, listener: StateListener) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

#[derive(Default)]
struct StoreInner {
    state: ConnectionState,
    next_id: ListenerId,
    listeners: Vec<(ListenerId, StateListener)>,
}

/// Process-wide connection state. Clones share the same state and listeners.
#[derive(Clone, Default)]
pub(crate) struct ConnectionStateStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl ConnectionStateStore {
    pub fn new(initial: ConnectionState) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().state = initial;
        store
    }

    pub fn set_state(&self, state: ConnectionState) {
        let listeners: Vec<StateListener> = {
            let mut inner = self.inner.borrow_mut();
            if inner.state == state {
                return;
            }
            inner.state = state;
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };

        tracing::info!(%state, "connection state changed");
        for l in listeners {
            l(state);
        }
    }

    /// A call is going out. Only a settled connection shows `Loading`.
    pub fn begin_request(&self) {
        if self.state() == ConnectionState::Connected {
            self.set_state(ConnectionState::Loading);
        }
    }

    /// Network-level failures mean the backend is unreachable; anything the
    /// server actually answered (even with an error) proves it is reachable.
    pub fn report_error(&self, e: &ApiError) {
        if e.kind() == ApiErrorKind::Network {
            self.set_state(ConnectionState::ConnectionLost);
        } else {
            self.report_success();
        }
    }

    pub fn report_success(&self) {
        self.set_state(ConnectionState::Connected);
    }

    /// The browser regained a network. Views re-fetch and settle the state.
    pub fn browser_online(&self) {
        if self.state().is_offline() {
            self.set_state(ConnectionState::Reconnecting);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl ConnectionSource for ConnectionStateStore {
    fn state(&self) -> ConnectionState {
        self.inner.borrow().state
    }

    fn add_listener(&self, listener: StateListener) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.listeners.push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
    }
}

/// Feeds `navigator.onLine` and the window `online`/`offline` events into `store`.
///
/// The returned handles must be kept alive for as long as the store should
/// follow the browser.
pub(crate) fn watch_browser_connectivity(
    store: &ConnectionStateStore,
) -> (WindowListenerHandle, WindowListenerHandle) {
    let on_line = web_sys::window()
        .map(|w| w.navigator().on_line())
        .unwrap_or(true);
    if !on_line {
        store.set_state(ConnectionState::ConnectionLost);
    }

    let online_store = store.clone();
    let online = window_event_listener(ev::online, move |_| {
        online_store.browser_online();
    });

    let offline_store = store.clone();
    let offline = window_event_listener(ev::offline, move |_| {
        offline_store.set_state(ConnectionState::ConnectionLost);
    });

    (online, offline)
}

/// Mirrors an external [`ConnectionSource`] as an "offline" flag.
///
/// The callback fires only when the flag flips, never for moves between two
/// online states (e.g. `Loading` -> `Connected`).
pub(crate) struct ConnectivityObserver {
    source: Rc<dyn ConnectionSource>,
    listener: Cell<Option<ListenerId>>,
}

impl ConnectivityObserver {
    pub fn new(source: Rc<dyn ConnectionSource>, on_change: impl Fn(bool) + 'static) -> Self {
        let last = Rc::new(Cell::new(source.state().is_offline()));
        let id = source.add_listener(Rc::new(move |state: ConnectionState| {
            let offline = state.is_offline();
            if last.replace(offline) != offline {
                on_change(offline);
            }
        }));

        Self {
            source,
            listener: Cell::new(Some(id)),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.source.state().is_offline()
    }

    pub fn teardown(&self) {
        if let Some(id) = self.listener.take() {
            self.source.remove_listener(id);
        }
    }
}

impl Drop for ConnectivityObserver {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe(store: &ConnectionStateStore) -> (ConnectivityObserver, Rc<RefCell<Vec<bool>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = seen.clone();
        let observer = ConnectivityObserver::new(Rc::new(store.clone()), move |offline| {
            seen2.borrow_mut().push(offline)
        });
        (observer, seen)
    }

    #[test]
    fn fires_only_on_offline_transitions() {
        let store = ConnectionStateStore::new(ConnectionState::Connected);
        let (observer, seen) = observe(&store);
        assert!(!observer.is_offline());

        store.set_state(ConnectionState::Loading);
        store.set_state(ConnectionState::Connected);
        assert!(seen.borrow().is_empty());

        store.set_state(ConnectionState::ConnectionLost);
        assert!(observer.is_offline());
        store.set_state(ConnectionState::ConnectionLost);
        store.set_state(ConnectionState::Reconnecting);
        store.set_state(ConnectionState::Connected);

        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn starts_from_current_state() {
        let store = ConnectionStateStore::new(ConnectionState::ConnectionLost);
        let (observer, seen) = observe(&store);
        assert!(observer.is_offline());
        store.set_state(ConnectionState::ConnectionLost);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn teardown_unsubscribes_and_is_idempotent() {
        let store = ConnectionStateStore::default();
        let (observer, seen) = observe(&store);
        assert_eq!(store.listener_count(), 1);

        observer.teardown();
        observer.teardown();
        assert_eq!(store.listener_count(), 0);

        store.set_state(ConnectionState::ConnectionLost);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn drop_unsubscribes() {
        let store = ConnectionStateStore::default();
        {
            let _ = observe(&store);
        }
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn only_network_errors_mark_offline() {
        let store = ConnectionStateStore::default();
        store.report_error(&ApiError::Validation {
            message: "bad".to_string(),
        });
        assert_eq!(store.state(), ConnectionState::Connected);

        store.report_error(&ApiError::Network("refused".to_string()));
        assert_eq!(store.state(), ConnectionState::ConnectionLost);

        store.report_success();
        assert_eq!(store.state(), ConnectionState::Connected);
    }

    #[test]
    fn requests_show_loading_until_answered() {
        let store = ConnectionStateStore::default();
        store.begin_request();
        assert_eq!(store.state(), ConnectionState::Loading);
        store.report_success();
        assert_eq!(store.state(), ConnectionState::Connected);

        store.begin_request();
        store.report_error(&ApiError::Http {
            status: 500,
            body: String::new(),
        });
        assert_eq!(store.state(), ConnectionState::Connected);
    }

    #[test]
    fn browser_online_reconnects_until_a_call_succeeds() {
        let store = ConnectionStateStore::new(ConnectionState::ConnectionLost);
        let (_observer, seen) = observe(&store);

        store.browser_online();
        assert_eq!(store.state(), ConnectionState::Reconnecting);
        assert_eq!(*seen.borrow(), vec![false]);

        // A request while reconnecting keeps the reconnecting state.
        store.begin_request();
        assert_eq!(store.state(), ConnectionState::Reconnecting);
        store.report_success();
        assert_eq!(store.state(), ConnectionState::Connected);

        // Already online: nothing to reconnect.
        store.browser_online();
        assert_eq!(store.state(), ConnectionState::Connected);
    }
}
