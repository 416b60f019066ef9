//! Run-once semantics: memoization of success and failure, concurrent
//! first callers, and cooperative cancellation.

#[cfg(test)]
mod tests {
    use ignition_bus::{handler_fn, HandlerError};
    use ignition_runtime::{
        BootPayload, BootstrapError, BootstrapOptions, BootstrapPhase, Bootstrapper,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::watch;

    fn counting_options(runs: Arc<AtomicUsize>) -> BootstrapOptions {
        BootstrapOptions::new()
            .with_user_conf_root("/opt/app")
            .on_pre_bootstrap(handler_fn("run-counter", move |_: BootPayload| {
                let runs = Arc::clone(&runs);
                async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }))
    }

    #[tokio::test]
    async fn test_second_call_returns_the_same_instance() {
        let runs = Arc::new(AtomicUsize::new(0));
        let bootstrapper = Bootstrapper::new(counting_options(Arc::clone(&runs)));

        let first = bootstrapper.bootstrap().await.unwrap();
        let second = bootstrapper.bootstrap().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.run_id(), second.run_id());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_callers_share_one_run() {
        let runs = Arc::new(AtomicUsize::new(0));
        let bootstrapper = Arc::new(Bootstrapper::new(counting_options(Arc::clone(&runs))));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let bootstrapper = Arc::clone(&bootstrapper);
            tasks.push(tokio::spawn(async move { bootstrapper.bootstrap().await }));
        }

        let mut instances = Vec::new();
        for task in tasks {
            instances.push(task.await.unwrap().unwrap());
        }

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }

    #[tokio::test]
    async fn test_failure_is_memoized_and_never_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&attempts);
        let bootstrapper = Bootstrapper::new(
            BootstrapOptions::new()
                .with_user_conf_root("/opt/app")
                .on_pre_bootstrap(handler_fn("always-fails", move |_: BootPayload| {
                    let probe = Arc::clone(&probe);
                    async move {
                        probe.fetch_add(1, Ordering::SeqCst);
                        Err(HandlerError::new("persistent failure"))
                    }
                })),
        );

        let first = bootstrapper.bootstrap().await.unwrap_err();
        let second = bootstrapper.bootstrap().await.unwrap_err();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(bootstrapper.phase(), BootstrapPhase::Failed);
    }

    #[tokio::test]
    async fn test_cancellation_before_start_stops_at_config() {
        let (_tx, rx) = watch::channel(true);
        let bootstrapper = Bootstrapper::new(
            BootstrapOptions::new()
                .with_user_conf_root("/opt/app")
                .with_cancel(rx),
        );
        let err = bootstrapper.bootstrap().await.unwrap_err();

        assert_eq!(err.stage(), "config");
        assert!(matches!(&*err, BootstrapError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_cancellation_raised_mid_run_stops_at_next_stage() {
        let (tx, rx) = watch::channel(false);
        let tx = Arc::new(tx);
        let canceller = Arc::clone(&tx);
        let bootstrapper = Bootstrapper::new(
            BootstrapOptions::new()
                .with_user_conf_root("/opt/app")
                .with_cancel(rx)
                .on_pre_bootstrap(handler_fn("canceller", move |_: BootPayload| {
                    let canceller = Arc::clone(&canceller);
                    async move {
                        let _ = canceller.send(true);
                        Ok(())
                    }
                })),
        );
        let err = bootstrapper.bootstrap().await.unwrap_err();

        // The handler itself succeeded; the run stops at the next boundary.
        assert_eq!(err.stage(), "post-bootstrap");
        assert!(matches!(&*err, BootstrapError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_phase_reports_ready_after_success() {
        let bootstrapper =
            Bootstrapper::new(BootstrapOptions::new().with_user_conf_root("/opt/app"));
        assert_eq!(bootstrapper.phase(), BootstrapPhase::Created);
        bootstrapper.bootstrap().await.unwrap();
        assert_eq!(bootstrapper.phase(), BootstrapPhase::Ready);
    }
}
