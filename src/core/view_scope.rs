// SPDX-License-Identifier: GPL-3.0-only

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use futures::future::{AbortHandle, Abortable, Aborted};

/// Lifetime of a view that waits on fetches.
///
/// Fetches started through [`ViewScope::run`] are aborted when the scope is
/// closed or dropped, so a result never lands in a view that is already gone.
#[derive(Debug, Default)]
pub struct ViewScope {
    inner: Mutex<ScopeState>,
}

#[derive(Debug, Default)]
struct ScopeState {
    closed: bool,
    pending: Vec<PendingFetch>,
}

#[derive(Debug)]
struct PendingFetch {
    handle: AbortHandle,
    finished: Arc<AtomicBool>,
}

impl PendingFetch {
    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ties `future` to this scope. Awaiting the result gives `Err(Aborted)`
    /// if the scope was closed first, including when it is already closed.
    pub fn run<F: Future>(
        &self,
        future: F,
    ) -> impl Future<Output = Result<F::Output, Aborted>> + use<F> {
        let (handle, registration) = AbortHandle::new_pair();
        let finished = Arc::new(AtomicBool::new(false));

        {
            let mut state = self.lock();
            state.pending.retain(|fetch| !fetch.is_finished());

            if state.closed {
                handle.abort();
            } else {
                state.pending.push(PendingFetch {
                    handle,
                    finished: finished.clone(),
                });
            }
        }

        let fetch = Abortable::new(future, registration);
        async move {
            let result = fetch.await;
            finished.store(true, Ordering::Release);
            result
        }
    }

    /// Aborts every pending fetch and refuses new ones
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        for fetch in state.pending.drain(..) {
            fetch.handle.abort();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, ScopeState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn finished_work_is_delivered() {
        let scope = ViewScope::new();
        let result = scope.run(async { 25 }).await;
        assert_eq!(result, Ok(25));
    }

    #[tokio::test]
    async fn closing_discards_pending_work() {
        let scope = ViewScope::new();
        let pending = scope.run(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "too late"
        });

        scope.close();
        assert!(pending.await.is_err());
    }

    #[tokio::test]
    async fn dropping_the_scope_discards_pending_work() {
        let scope = ViewScope::new();
        let pending = tokio::spawn(scope.run(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }));

        drop(scope);
        assert!(pending.await.unwrap().is_err());
    }

    #[tokio::test]
    async fn closed_scope_aborts_new_work_right_away() {
        let scope = ViewScope::new();
        scope.close();

        assert!(scope.is_closed());
        assert!(scope.run(async { 1 }).await.is_err());
    }

    #[tokio::test]
    async fn finished_fetches_are_forgotten() {
        let scope = ViewScope::new();
        for page in 0..50 {
            assert_eq!(scope.run(async move { page }).await, Ok(page));
        }

        let pending = scope.run(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        assert_eq!(scope.lock().pending.len(), 1);

        scope.close();
        assert!(pending.await.is_err());
    }
}
