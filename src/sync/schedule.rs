use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Cancelled once, stays cancelled. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub(crate) struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Deferred work bound to a lifetime.
pub(crate) trait Scheduler {
    /// Run `task` after `delay` unless `token` was cancelled in the meantime.
    fn schedule(&self, delay: Duration, token: CancelToken, task: LocalBoxFuture<'static, ()>);
}

/// Browser timers on the Leptos executor.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TimerScheduler;

impl Scheduler for TimerScheduler {
    fn schedule(&self, delay: Duration, token: CancelToken, task: LocalBoxFuture<'static, ()>) {
        let ms = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        leptos::task::spawn_local(async move {
            if ms > 0 {
                TimeoutFuture::new(ms).await;
            }
            if token.is_cancelled() {
                tracing::debug!("scheduled task dropped after teardown");
                return;
            }
            task.await;
        });
    }
}


#[cfg(test)]
mod tests {
    use super::manual::ManualScheduler;
    use super::*;
    use futures::FutureExt;
    use std::cell::RefCell;

    #[test]
    fn tasks_run_when_due_in_order() {
        let sched = ManualScheduler::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, ms) in [("b", 200u64), ("a", 100)] {
            let log = log.clone();
            sched.schedule(
                Duration::from_millis(ms),
                CancelToken::new(),
                async move { log.borrow_mut().push(name) }.boxed_local(),
            );
        }

        sched.advance(99);
        assert!(log.borrow().is_empty());
        sched.advance(101);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(sched.now_ms(), 200);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn cancelled_tasks_are_skipped() {
        let sched = ManualScheduler::default();
        let ran = Rc::new(Cell::new(false));
        let token = CancelToken::new();
        let r = ran.clone();
        sched.schedule(
            Duration::from_millis(10),
            token.clone(),
            async move { r.set(true) }.boxed_local(),
        );

        token.cancel();
        assert!(token.clone().is_cancelled());
        sched.advance(10);
        assert!(!ran.get());
    }
}
