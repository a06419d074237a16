//! Submit-and-await primitive.
//!
//! Runs a blocking store call on a worker pool and hands its outcome back to
//! the awaiting task over a oneshot channel. The await on that channel is the
//! only suspension point in the bridge.
//!
//! # Outcome Handling
//!
//! ```text
//! worker thread                                   awaiting task
//! ─────────────                                   ─────────────
//! catch_unwind(call)
//!   Ok(value)            ─► Ok(value)          ─►  value
//!   Err(Exhausted)       ─► Err(Runtime)       ─►  runtime failure
//!   Err(other)           ─► Err(Store(other))  ─►  same error
//!   panic                ─► Err(Panicked)      ─►  panic message
//! job dropped unrun      ─► sender dropped     ─►  WorkerLost
//! ```
//!
//! Every path completes the channel or drops the sender, so the awaiting task
//! always wakes up.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::oneshot;

use super::{BridgeError, BridgeResult};
use crate::executor::Executor;
use crate::store::{StoreError, StoreResult};
use crate::telemetry::BridgeMetrics;

/// Run a blocking call on `executor` and await its result.
///
/// `None` runs the call on the blocking pool of the current tokio runtime,
/// or on the [`DefaultPool`](crate::executor::DefaultPool) outside one.
/// The call's value is returned unchanged. Store errors come back as
/// [`BridgeError::Store`], except the exhaustion kind which becomes
/// [`BridgeError::Runtime`].
///
/// Dropping the returned future does not stop the call; its result is
/// discarded when it arrives.
pub async fn run_blocking<T, F>(executor: Option<Executor>, call: F) -> BridgeResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    submit(executor, None, "run_blocking", call).await
}

/// Classify a store error.
///
/// The exhaustion kind is always replaced with a runtime failure carrying the
/// original as its source. Everything else passes through.
pub fn translate(err: StoreError) -> BridgeError {
    if err.is_exhaustion() {
        BridgeError::Runtime { source: err }
    } else {
        BridgeError::Store(err)
    }
}

pub(crate) async fn submit<T, F>(
    executor: Option<Executor>,
    metrics: Option<&Arc<BridgeMetrics>>,
    operation: &'static str,
    call: F,
) -> BridgeResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let executor = match executor {
        Some(executor) => executor,
        None => {
            if let Some(metrics) = metrics {
                metrics.default_pool_used();
            }
            Executor::runtime_default()
        }
    };

    let (tx, rx) = oneshot::channel();
    let job_metrics = metrics.cloned();

    tracing::debug!(operation, pool = executor.label(), "Submitting blocking call");
    if let Some(metrics) = metrics {
        metrics.task_submitted();
    }

    executor.submit(Box::new(move || {
        let outcome = invoke(operation, call, job_metrics.as_deref());
        // The receiver is gone if the caller stopped waiting.
        let _ = tx.send(outcome);
    }));

    match rx.await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(operation, "Worker pool dropped blocking call");
            if let Some(metrics) = metrics {
                metrics.task_failed();
            }
            Err(BridgeError::WorkerLost)
        }
    }
}

fn invoke<T, F>(
    operation: &'static str,
    call: F,
    metrics: Option<&BridgeMetrics>,
) -> BridgeResult<T>
where
    F: FnOnce() -> StoreResult<T>,
{
    let outcome = match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            let err = translate(err);
            if err.is_runtime_failure() {
                tracing::warn!(
                    operation,
                    "Exhaustion signal from blocking call converted to runtime failure"
                );
                if let Some(metrics) = metrics {
                    metrics.exhaustion_translated();
                }
            }
            Err(err)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(operation, panic = %message, "Blocking call panicked");
            if let Some(metrics) = metrics {
                metrics.task_panicked();
            }
            Err(BridgeError::Panicked(message))
        }
    };

    if let Some(metrics) = metrics {
        match outcome {
            Ok(_) => metrics.task_succeeded(),
            Err(_) => metrics.task_failed(),
        }
    }
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::time::Duration;

    use tokio::time::timeout;

    const BOUND: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_value_is_returned_unchanged() {
        let result = run_blocking(None, || Ok(vec![1, 2, 3])).await.unwrap();
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_exhaustion_becomes_runtime_failure() {
        let call = || -> StoreResult<()> { Err(StoreError::Exhausted("exhausted".into())) };

        let err = timeout(BOUND, run_blocking(None, call))
            .await
            .expect("bridge must not hang")
            .unwrap_err();

        assert!(err.is_runtime_failure());
        assert!(matches!(
            err.source().and_then(|s| s.downcast_ref::<StoreError>()),
            Some(StoreError::Exhausted(_))
        ));
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let call = || -> StoreResult<()> { Err(StoreError::Backend("connection refused".into())) };

        let err = run_blocking(None, call).await.unwrap_err();

        assert!(matches!(
            err.store_error(),
            Some(StoreError::Backend(m)) if m == "connection refused"
        ));
        assert_eq!(err.to_string(), "backend error: connection refused");
    }

    #[tokio::test]
    async fn test_panic_is_reported() {
        let call = || -> StoreResult<()> { panic!("store exploded") };

        let err = timeout(BOUND, run_blocking(None, call))
            .await
            .expect("bridge must not hang")
            .unwrap_err();

        assert!(matches!(err, BridgeError::Panicked(ref m) if m == "store exploded"));
    }

    #[tokio::test]
    async fn test_runs_on_given_executor() {
        let executor = Executor::tokio(tokio::runtime::Handle::current());
        let caller = std::thread::current().id();

        let worker = run_blocking(Some(executor), || Ok(std::thread::current().id()))
            .await
            .unwrap();

        assert_ne!(worker, caller);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unresolved_calls_run_concurrently_on_runtime_blocking_pool() {
        let barrier = Arc::new(std::sync::Barrier::new(2));
        let call = |barrier: Arc<std::sync::Barrier>| {
            move || {
                barrier.wait();
                Ok::<_, StoreError>(std::thread::current().name().map(str::to_string))
            }
        };

        let (a, b) = timeout(BOUND, async {
            tokio::join!(
                run_blocking(None, call(Arc::clone(&barrier))),
                run_blocking(None, call(Arc::clone(&barrier))),
            )
        })
        .await
        .expect("both calls should pass the barrier");

        for name in [a.unwrap(), b.unwrap()] {
            assert_eq!(name.as_deref(), Some("tokio-runtime-worker"));
        }
    }

    #[test]
    fn test_unresolved_calls_run_concurrently_outside_runtime() {
        let barrier = Arc::new(std::sync::Barrier::new(2));
        let call = |barrier: Arc<std::sync::Barrier>| {
            move || {
                barrier.wait();
                Ok::<_, StoreError>(std::thread::current().name().map(str::to_string))
            }
        };
        let (tx, rx) = std::sync::mpsc::channel();

        let first = call(Arc::clone(&barrier));
        let second = call(Arc::clone(&barrier));
        std::thread::spawn(move || {
            let names = futures::executor::block_on(futures::future::join(
                run_blocking(None, first),
                run_blocking(None, second),
            ));
            let _ = tx.send(names);
        });

        let (a, b) = rx
            .recv_timeout(BOUND)
            .expect("both calls should pass the barrier");
        for name in [a.unwrap(), b.unwrap()] {
            let name = name.unwrap();
            assert!(name.starts_with(crate::executor::FALLBACK_THREAD_NAME_PREFIX));
        }
    }

    #[test]
    fn test_dropped_job_reports_worker_lost() {
        struct Dropping;
        impl crate::executor::WorkerPool for Dropping {
            fn label(&self) -> &str {
                "dropping"
            }
            fn submit(&self, job: crate::executor::Job) {
                drop(job);
            }
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let err = runtime
            .block_on(run_blocking(Some(Executor::new(Dropping)), || Ok(())))
            .unwrap_err();

        assert!(matches!(err, BridgeError::WorkerLost));
    }

    #[test]
    fn test_metrics_record_outcomes() {
        let metrics = Arc::new(BridgeMetrics::new());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        runtime.block_on(async {
            let _ = submit(None, Some(&metrics), "ok", || Ok(1)).await;
            let _ = submit(None, Some(&metrics), "exhausted", || -> StoreResult<()> {
                Err(StoreError::Exhausted(String::new()))
            })
            .await;
        });

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.submitted, 2);
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.translated, 1);
        assert_eq!(snapshot.default_pool_fallbacks, 2);
    }
}
