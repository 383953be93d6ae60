//! Repeating status checks for long-running backend jobs.
//!
//! A poller issues one request right away, then waits a fixed interval after each response
//! before issuing the next, so two ticks of the same poller never overlap. It stops on its own
//! when the job reports completion or a request fails. Its owner can also stop it by dropping
//! the [`PollHandle`]. A response that lands after cancellation is thrown away.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use crate::error::ApiError;
use crate::models::{MatchingStatus, ResyncStatus};

pub trait JobStatus {
    fn is_complete(&self) -> bool;
    fn processed(&self) -> u32;
    fn total(&self) -> u32;

    fn percent(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            (f64::from(self.processed()) / f64::from(self.total()) * 100.0).min(100.0)
        }
    }
}

impl JobStatus for MatchingStatus {
    fn is_complete(&self) -> bool {
        self.done
    }
    fn processed(&self) -> u32 {
        self.processed
    }
    fn total(&self) -> u32 {
        self.total
    }
}

impl JobStatus for ResyncStatus {
    fn is_complete(&self) -> bool {
        !self.in_progress
    }
    fn processed(&self) -> u32 {
        self.processed
    }
    fn total(&self) -> u32 {
        self.total
    }
}

#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Rc<Cell<bool>>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Await a one-off request, dropping its result if `cancel` fired while it was in flight.
pub async fn unless_cancelled<T, Fut>(request: Fut, cancel: &CancelFlag) -> Option<T>
where
    Fut: Future<Output = T>,
{
    let result = request.await;
    (!cancel.is_cancelled()).then_some(result)
}

/// Keeps a poller alive. Dropping it stops the poller at its next suspension point.
#[derive(Debug)]
pub struct PollHandle {
    flag: CancelFlag,
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.flag.cancel();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed,
    Failed(ApiError),
    Cancelled,
}

/// The loop itself, independent of timers and the browser so it can be driven directly.
pub async fn run_poll_loop<T, F, Fut, S, SFut, U>(
    fetch: F,
    sleep: S,
    cancel: CancelFlag,
    mut on_update: U,
) -> PollOutcome
where
    T: JobStatus,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    S: Fn() -> SFut,
    SFut: Future<Output = ()>,
    U: FnMut(T),
{
    loop {
        let result = fetch().await;
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        match result {
            Ok(status) => {
                let complete = status.is_complete();
                on_update(status);
                if complete {
                    return PollOutcome::Completed;
                }
            }
            Err(err) => return PollOutcome::Failed(err),
        }
        sleep().await;
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
    }
}

/// Spawn a poller on the UI task queue. `on_finish` fires once when the poller stops by itself;
/// it never fires after the handle was dropped.
pub fn start_polling<T, F, Fut>(
    label: String,
    interval_ms: u32,
    fetch: F,
    on_update: Callback<T>,
    on_finish: Callback<PollOutcome>,
) -> PollHandle
where
    T: JobStatus + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let flag = CancelFlag::default();
    let loop_flag = flag.clone();
    log::debug!("poller {label} started");
    spawn_local(async move {
        let outcome = run_poll_loop(
            fetch,
            move || TimeoutFuture::new(interval_ms),
            loop_flag,
            |status| on_update.emit(status),
        )
        .await;
        match &outcome {
            PollOutcome::Completed => log::debug!("poller {label} completed"),
            PollOutcome::Failed(err) => log::warn!("poller {label} stopped: {err}"),
            PollOutcome::Cancelled => {
                log::debug!("poller {label} cancelled");
                return;
            }
        }
        on_finish.emit(outcome);
    });
    PollHandle { flag }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::ready;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    fn status(processed: u32, total: u32, done: bool) -> MatchingStatus {
        MatchingStatus {
            processed,
            total,
            done,
        }
    }

    struct Script {
        responses: RefCell<VecDeque<Result<MatchingStatus, ApiError>>>,
        calls: Cell<usize>,
    }

    impl Script {
        fn new(responses: Vec<Result<MatchingStatus, ApiError>>) -> Rc<Self> {
            Rc::new(Self {
                responses: RefCell::new(responses.into()),
                calls: Cell::new(0),
            })
        }

        fn next(&self) -> Result<MatchingStatus, ApiError> {
            self.calls.set(self.calls.get() + 1);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(status(0, 0, false)))
        }
    }

    #[test]
    fn stops_requesting_after_completion() {
        let script = Script::new(vec![
            Ok(status(1, 3, false)),
            Ok(status(2, 3, false)),
            Ok(status(3, 3, true)),
            Ok(status(9, 9, false)),
        ]);
        let mut seen = Vec::new();
        let fetch_script = script.clone();
        let outcome = block_on(run_poll_loop(
            move || ready(fetch_script.next()),
            || ready(()),
            CancelFlag::default(),
            |s: MatchingStatus| seen.push(s.processed),
        ));
        assert_eq!(outcome, PollOutcome::Completed);
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(script.calls.get(), 3);
    }

    #[test]
    fn stops_silently_on_error() {
        let script = Script::new(vec![
            Ok(status(1, 3, false)),
            Err(ApiError::Status { status: 500 }),
        ]);
        let mut updates = 0;
        let fetch_script = script.clone();
        let outcome = block_on(run_poll_loop(
            move || ready(fetch_script.next()),
            || ready(()),
            CancelFlag::default(),
            |_: MatchingStatus| updates += 1,
        ));
        assert_eq!(outcome, PollOutcome::Failed(ApiError::Status { status: 500 }));
        assert_eq!(updates, 1);
        assert_eq!(script.calls.get(), 2);
    }

    #[test]
    fn sleeps_between_ticks() {
        let script = Script::new(vec![Ok(status(0, 2, false)), Ok(status(2, 2, true))]);
        let sleeps = Cell::new(0);
        let fetch_script = script.clone();
        block_on(run_poll_loop(
            move || ready(fetch_script.next()),
            || {
                sleeps.set(sleeps.get() + 1);
                ready(())
            },
            CancelFlag::default(),
            |_: MatchingStatus| {},
        ));
        assert_eq!(sleeps.get(), 1);
    }

    #[test]
    fn response_after_cancel_is_discarded() {
        let flag = CancelFlag::default();
        let fetch_flag = flag.clone();
        let mut updates = 0;
        let outcome = block_on(run_poll_loop(
            move || {
                fetch_flag.cancel();
                ready(Ok(status(1, 1, true)))
            },
            || ready(()),
            flag,
            |_: MatchingStatus| updates += 1,
        ));
        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(updates, 0);
    }

    #[test]
    fn cancel_during_wait_prevents_next_request() {
        let script = Script::new(vec![Ok(status(1, 5, false))]);
        let flag = CancelFlag::default();
        let sleep_flag = flag.clone();
        let fetch_script = script.clone();
        let outcome = block_on(run_poll_loop(
            move || ready(fetch_script.next()),
            move || {
                sleep_flag.cancel();
                ready(())
            },
            flag,
            |_: MatchingStatus| {},
        ));
        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(script.calls.get(), 1);
    }

    #[test]
    fn dropping_handle_cancels() {
        let flag = CancelFlag::default();
        let handle = PollHandle { flag: flag.clone() };
        assert!(!flag.is_cancelled());
        drop(handle);
        assert!(flag.is_cancelled());
    }

    #[test]
    fn superseded_request_result_is_dropped() {
        let flag = CancelFlag::default();
        let request_flag = flag.clone();
        let stale = block_on(unless_cancelled(
            async move {
                request_flag.cancel();
                42
            },
            &flag,
        ));
        assert_eq!(stale, None);

        let fresh = block_on(unless_cancelled(ready(7), &CancelFlag::default()));
        assert_eq!(fresh, Some(7));
    }

    #[test]
    fn completion_flags_and_percentages() {
        assert!(status(0, 0, true).is_complete());
        assert!(ResyncStatus::default().is_complete());
        assert_eq!(status(1, 4, false).percent(), 25.0);
        assert_eq!(status(3, 0, false).percent(), 0.0);
    }
}
