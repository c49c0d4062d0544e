//! Concurrent access to the shared cache

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use spc_domain::Configuration;
use spc_domain::ports::Container;
use spc_infrastructure::cache::ServiceProviderCache;

use crate::test_utils::{
    CoreFragment, CountingBackend, DiagnosticsEvent, RecordingDiagnosticsSink, ValueFragment,
};

fn shared_configuration() -> Configuration {
    Configuration::builder()
        .fragment(ValueFragment::shared(1))
        .fragment(ValueFragment::shared(2))
        .build()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_first_requests_build_once() {
    let backend = Arc::new(CountingBackend::slow(Duration::from_millis(50)));
    let cache = Arc::new(
        ServiceProviderCache::builder()
            .with_backend(backend.clone())
            .build(),
    );

    let handles = (0..100).map(|_| {
        let cache = Arc::clone(&cache);
        tokio::task::spawn_blocking(move || cache.get_or_add(&shared_configuration()))
    });
    let containers: Vec<Arc<dyn Container>> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("get_or_add failed"))
        .collect();

    assert_eq!(containers.len(), 100);
    assert!(
        containers
            .iter()
            .all(|container| Arc::ptr_eq(container, &containers[0]))
    );
    assert_eq!(backend.builds(), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_initialize_once() {
    let core = CoreFragment::default();
    let cache = Arc::new(ServiceProviderCache::default());

    let handles = (0..32).map(|_| {
        let cache = Arc::clone(&cache);
        let core = core.clone();
        tokio::task::spawn_blocking(move || {
            let config = Configuration::builder().fragment(Arc::new(core)).build();
            cache.get_or_add(&config).map(|container| container.id())
        })
    });
    let ids: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("get_or_add failed"))
        .collect();

    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(
        core.initialized.load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_configurations_build_in_parallel() {
    let backend = Arc::new(CountingBackend::slow(Duration::from_millis(10)));
    let cache = Arc::new(
        ServiceProviderCache::builder()
            .with_backend(backend.clone())
            .build(),
    );

    let handles = (0..10u64).flat_map(|value| {
        let cache = Arc::clone(&cache);
        (0..5).map(move |_| {
            let cache = Arc::clone(&cache);
            tokio::task::spawn_blocking(move || {
                let config = Configuration::builder()
                    .fragment(ValueFragment::shared(value))
                    .build();
                cache.get_or_add(&config).map(|container| container.id())
            })
        })
    });
    let results = join_all(handles).await;

    assert!(results.into_iter().all(|joined| matches!(joined, Ok(Ok(_)))));
    assert_eq!(backend.builds(), 10);
    assert_eq!(cache.len(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_inserts_signal_first_and_threshold_once() {
    for _ in 0..20 {
        let sink = Arc::new(RecordingDiagnosticsSink::default());
        let cache = Arc::new(
            ServiceProviderCache::builder()
                .with_diagnostics_sink(sink.clone())
                .with_warning_threshold(40)
                .build(),
        );

        let handles = (0..60u64).map(|request| {
            let cache = Arc::clone(&cache);
            tokio::task::spawn_blocking(move || {
                let config = Configuration::builder()
                    .fragment(ValueFragment::shared(request % 40))
                    .build();
                cache.get_or_add(&config).map(|container| container.id())
            })
        });
        let results = join_all(handles).await;

        assert!(results.into_iter().all(|joined| matches!(joined, Ok(Ok(_)))));
        assert_eq!(cache.len(), 40);
        assert_eq!(
            sink.count(|event| *event == DiagnosticsEvent::FirstContainer),
            1
        );
        assert_eq!(
            sink.count(|event| matches!(event, DiagnosticsEvent::TooManyContainers { .. })),
            1
        );
        assert_eq!(
            sink.count(|event| matches!(event, DiagnosticsEvent::DebugInfo { .. })),
            39
        );
    }
}
