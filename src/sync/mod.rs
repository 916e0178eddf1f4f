//! Keeps a view's data in step with the backend while tolerating disconnection.
//!
//! A view starts in [`SyncPhase::Loading`]. Mounting while offline serves the
//! last cached snapshot; mounting online fetches, caches, and opens the push
//! stream. `INFO` pushes schedule a full re-fetch after [`REFRESH_DELAY`] so the
//! notification is seen before the data changes under it.

mod schedule;
mod todos;

pub(crate) use schedule::TimerScheduler;
use schedule::{CancelToken, Scheduler};
pub(crate) use todos::TodoSync;

#[cfg(test)]
pub(crate) use schedule::manual::ManualScheduler;

use crate::api::{ApiError, ApiResult, PushEndpoint, StatsEndpoint, Subscription};
use crate::cache::OfflineCache;
use crate::connectivity::{ConnectionSource, ConnectionStateStore, ConnectivityObserver};
use crate::models::{Message, MessageType, Stats};
use crate::notify::{notification_for_error, Notification, Theme};
use crate::storage::STATS_CACHE_KEY;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

pub(crate) const REFRESH_DELAY: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Activity {
    Idle,
    Refreshing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SyncPhase {
    Loading,
    Online(Activity),
    OfflineCached,
}

/// Which push messages a view reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PushPolicy {
    /// Todo list: every kind is shown; only `INFO` triggers a re-fetch.
    AllMessages,
    /// Statistics: only `INFO` is shown and re-fetched.
    InfoOnly,
}

pub(crate) fn notification_for_message(m: &Message, policy: PushPolicy) -> Option<Notification> {
    let theme = match (m.message_type, policy) {
        (MessageType::Info, _) => Theme::Success,
        (MessageType::Editing, PushPolicy::AllMessages) => Theme::Warning,
        (MessageType::Error, PushPolicy::AllMessages) => Theme::Error,
        (_, PushPolicy::InfoOnly) => return None,
    };
    Some(Notification::new(m.data.clone(), theme))
}

/// Source of the full snapshot a view displays.
pub(crate) trait SnapshotEndpoint: 'static {
    type Snapshot: Clone + Default + Serialize + DeserializeOwned + 'static;

    const CACHE_KEY: &'static str;

    async fn fetch_snapshot(&self) -> ApiResult<Self::Snapshot>;
}

pub(crate) struct StatsSource<E>(pub Rc<E>);

impl<E: StatsEndpoint + 'static> SnapshotEndpoint for StatsSource<E> {
    type Snapshot = Stats;

    const CACHE_KEY: &'static str = STATS_CACHE_KEY;

    async fn fetch_snapshot(&self) -> ApiResult<Stats> {
        self.0.get_stats().await
    }
}

/// Collaborators every synced view needs.
#[derive(Clone)]
pub(crate) struct SyncDeps {
    pub cache: OfflineCache,
    pub connection: ConnectionStateStore,
    pub push: Rc<dyn PushEndpoint>,
    pub scheduler: Rc<dyn Scheduler>,
    pub notify: Rc<dyn Fn(Notification)>,
}

type ChangeListener<T> = Rc<dyn Fn(&T, SyncPhase)>;

struct ViewInner<S: SnapshotEndpoint> {
    source: S,
    deps: SyncDeps,
    policy: PushPolicy,
    data: RefCell<S::Snapshot>,
    phase: Cell<SyncPhase>,
    pending_refreshes: Cell<u32>,
    token: CancelToken,
    subscription: RefCell<Option<Subscription>>,
    observer: RefCell<Option<ConnectivityObserver>>,
    on_change: ChangeListener<S::Snapshot>,
}

/// One mounted view instance. Clones share state.
pub(crate) struct SyncedView<S: SnapshotEndpoint> {
    inner: Rc<ViewInner<S>>,
}

impl<S: SnapshotEndpoint> Clone for SyncedView<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub(crate) type StatsSync<E> = SyncedView<StatsSource<E>>;

impl<S: SnapshotEndpoint> SyncedView<S> {
    pub fn new(
        source: S,
        deps: SyncDeps,
        policy: PushPolicy,
        on_change: impl Fn(&S::Snapshot, SyncPhase) + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                source,
                deps,
                policy,
                data: RefCell::new(S::Snapshot::default()),
                phase: Cell::new(SyncPhase::Loading),
                pending_refreshes: Cell::new(0),
                token: CancelToken::new(),
                subscription: RefCell::new(None),
                observer: RefCell::new(None),
                on_change: Rc::new(on_change),
            }),
        }
    }

    fn downgrade(&self) -> Weak<ViewInner<S>> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<ViewInner<S>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn data(&self) -> S::Snapshot {
        self.inner.data.borrow().clone()
    }

    pub fn phase(&self) -> SyncPhase {
        self.inner.phase.get()
    }

    pub fn is_offline(&self) -> bool {
        self.inner
            .observer
            .borrow()
            .as_ref()
            .map(ConnectivityObserver::is_offline)
            .unwrap_or_else(|| self.inner.deps.connection.state().is_offline())
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    pub fn has_subscription(&self) -> bool {
        self.inner
            .subscription
            .borrow()
            .as_ref()
            .map(Subscription::is_active)
            .unwrap_or(false)
    }

    pub(crate) fn deps(&self) -> &SyncDeps {
        &self.inner.deps
    }

    fn emit(&self) {
        let data = self.data();
        (self.inner.on_change)(&data, self.phase());
    }

    fn set_phase(&self, phase: SyncPhase) {
        if self.inner.phase.replace(phase) != phase {
            self.emit();
        }
    }

    /// Replace the snapshot and keep the offline copy in step with it.
    pub(crate) fn set_data(&self, data: S::Snapshot) {
        if self.is_torn_down() {
            return;
        }
        self.inner.deps.cache.store(S::CACHE_KEY, &data);
        *self.inner.data.borrow_mut() = data;
        self.emit();
    }

    pub(crate) fn update_data(&self, f: impl FnOnce(&mut S::Snapshot)) {
        if self.is_torn_down() {
            return;
        }
        {
            let mut data = self.inner.data.borrow_mut();
            f(&mut data);
            self.inner.deps.cache.store(S::CACHE_KEY, &*data);
        }
        self.emit();
    }

    /// Report a failed call: connectivity bookkeeping plus a user notification.
    pub(crate) fn fail(&self, context: &str, e: &ApiError) {
        tracing::warn!(context, error = %e, "endpoint call failed");
        self.inner.deps.connection.report_error(e);
        if let Some(n) = notification_for_error(e) {
            (self.inner.deps.notify)(n);
        }
    }

    fn attach_observer(&self) {
        if self.inner.observer.borrow().is_some() {
            return;
        }
        let weak = self.downgrade();
        let observer = ConnectivityObserver::new(
            Rc::new(self.inner.deps.connection.clone()),
            move |offline| {
                if let Some(view) = Self::upgrade(&weak) {
                    view.on_connectivity(offline);
                }
            },
        );
        *self.inner.observer.borrow_mut() = Some(observer);
    }

    pub async fn mount(&self) {
        if self.is_torn_down() {
            return;
        }
        self.attach_observer();

        if self.is_offline() {
            self.load_cached();
            return;
        }

        tracing::info!(key = S::CACHE_KEY, "initial fetch");
        self.inner.deps.connection.begin_request();
        match self.inner.source.fetch_snapshot().await {
            Ok(fetched) => {
                if self.is_torn_down() {
                    return;
                }
                self.accept(fetched);
                self.set_phase(SyncPhase::Online(Activity::Idle));
                self.open_subscription();
            }
            Err(e) => {
                if self.is_torn_down() {
                    return;
                }
                self.fail("initial fetch", &e);
                // A network failure has already flipped us to the cached view.
                if self.phase() == SyncPhase::Loading {
                    self.set_phase(SyncPhase::Online(Activity::Idle));
                    self.open_subscription();
                }
            }
        }
    }

    fn load_cached(&self) {
        let cached = self
            .inner
            .deps
            .cache
            .get_or(S::CACHE_KEY, S::Snapshot::default());
        tracing::info!(key = S::CACHE_KEY, "offline: showing cached snapshot");
        *self.inner.data.borrow_mut() = cached;
        self.inner.phase.set(SyncPhase::OfflineCached);
        self.emit();
    }

    fn accept(&self, fetched: S::Snapshot) {
        self.inner.deps.connection.report_success();
        self.set_data(fetched);
    }

    fn open_subscription(&self) {
        if self.is_torn_down() || self.has_subscription() {
            return;
        }

        let weak = self.downgrade();
        let on_next: Rc<dyn Fn(Message)> = Rc::new(move |m| {
            if let Some(view) = Self::upgrade(&weak) {
                view.on_message(m);
            }
        });

        match self.inner.deps.push.subscribe(on_next) {
            Ok(sub) => *self.inner.subscription.borrow_mut() = Some(sub),
            Err(e) => tracing::warn!(error = %e, "could not open events subscription"),
        }
    }

    pub fn on_message(&self, m: Message) {
        if self.is_torn_down() {
            return;
        }
        tracing::debug!(kind = %m.message_type, data = %m.data, "push message");

        if let Some(n) = notification_for_message(&m, self.inner.policy) {
            (self.inner.deps.notify)(n);
        }
        if m.message_type == MessageType::Info {
            self.schedule_refresh(REFRESH_DELAY);
        }
    }

    fn schedule_refresh(&self, delay: Duration) {
        if let SyncPhase::Online(_) = self.phase() {
            self.set_phase(SyncPhase::Online(Activity::Refreshing));
        }
        self.inner
            .pending_refreshes
            .set(self.inner.pending_refreshes.get() + 1);

        let view = self.clone();
        self.inner.deps.scheduler.schedule(
            delay,
            self.inner.token.clone(),
            async move {
                view.refresh().await;
                let left = view.inner.pending_refreshes.get().saturating_sub(1);
                view.inner.pending_refreshes.set(left);
                if left == 0 && view.phase() == SyncPhase::Online(Activity::Refreshing) {
                    view.set_phase(SyncPhase::Online(Activity::Idle));
                }
            }
            .boxed_local(),
        );
    }

    /// Re-fetch the full snapshot. Skipped while offline or after teardown.
    pub async fn refresh(&self) {
        if self.is_torn_down() || self.is_offline() {
            return;
        }
        self.inner.deps.connection.begin_request();
        match self.inner.source.fetch_snapshot().await {
            Ok(fetched) => self.accept(fetched),
            Err(e) => {
                if !self.is_torn_down() {
                    tracing::warn!(key = S::CACHE_KEY, error = %e, "refresh failed");
                    self.inner.deps.connection.report_error(&e);
                }
            }
        }
    }

    fn on_connectivity(&self, offline: bool) {
        if self.is_torn_down() {
            return;
        }

        if offline {
            if self.phase() == SyncPhase::Loading {
                self.load_cached();
            } else {
                self.set_phase(SyncPhase::OfflineCached);
            }
            return;
        }

        tracing::info!(key = S::CACHE_KEY, "back online: re-fetching");
        self.set_phase(SyncPhase::Online(Activity::Refreshing));
        let view = self.clone();
        self.inner.deps.scheduler.schedule(
            Duration::ZERO,
            self.inner.token.clone(),
            async move {
                view.refresh().await;
                if view.phase() == SyncPhase::Online(Activity::Refreshing)
                    && view.inner.pending_refreshes.get() == 0
                {
                    view.set_phase(SyncPhase::Online(Activity::Idle));
                }
                view.open_subscription();
            }
            .boxed_local(),
        );
    }

    /// Cancel the push stream, pending refreshes, and the connectivity
    /// listener. Safe to call more than once.
    pub fn teardown(&self) {
        if !self.inner.token.is_cancelled() {
            tracing::debug!(key = S::CACHE_KEY, "view teardown");
        }
        self.inner.token.cancel();

        let sub = self.inner.subscription.borrow_mut().take();
        if let Some(sub) = sub {
            sub.cancel();
        }

        let observer = self.inner.observer.borrow_mut().take();
        if let Some(observer) = observer {
            observer.teardown();
        }
    }
}
