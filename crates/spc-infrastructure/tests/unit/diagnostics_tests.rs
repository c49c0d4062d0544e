//! Diagnostics reporter tests

use std::sync::Arc;

use spc_domain::ports::{Container, ContainerBackend, DiagnosticsSink};
use spc_domain::value_objects::{
    DebugSnapshot, Fingerprint, Implementation, Registration, RegistrationSet,
};
use spc_infrastructure::cache::{CacheEntry, ContainerStore, DiagnosticsReporter};
use spc_infrastructure::di::CatalogBackend;
use spc_infrastructure::TracingDiagnosticsSink;

use crate::test_utils::{DiagnosticsEvent, RecordingDiagnosticsSink};

fn container(registrations: RegistrationSet) -> Arc<dyn Container> {
    CatalogBackend::new()
        .build(registrations)
        .expect("catalog build")
}

/// Insert an empty container under `key` and report it
fn insert_and_report(store: &ContainerStore, reporter: &DiagnosticsReporter, key: u64) {
    insert_container_and_report(store, reporter, key, container(RegistrationSet::new()));
}

fn insert_container_and_report(
    store: &ContainerStore,
    reporter: &DiagnosticsReporter,
    key: u64,
    container: Arc<dyn Container>,
) {
    let fingerprint = Fingerprint::new(key);
    let snapshot: DebugSnapshot = [("key", key.to_string())].into_iter().collect();
    let outcome = store
        .get_or_build(fingerprint, || Ok(CacheEntry::new(container, snapshot)))
        .unwrap();
    let previous_len = outcome.inserted_after.expect("fresh insert");
    reporter.report(store, fingerprint, &outcome.entry, previous_len);
}

#[test]
fn test_first_container_then_debug_info_with_prior_snapshots() {
    let sink = Arc::new(RecordingDiagnosticsSink::default());
    let reporter = DiagnosticsReporter::new(20, sink.clone());
    let store = ContainerStore::new();

    for key in 1..=3 {
        insert_and_report(&store, &reporter, key);
    }

    assert_eq!(
        sink.events(),
        vec![
            DiagnosticsEvent::FirstContainer,
            DiagnosticsEvent::DebugInfo { prior: 1 },
            DiagnosticsEvent::DebugInfo { prior: 2 },
        ]
    );
}

#[test]
fn test_too_many_fires_exactly_at_threshold() {
    let sink = Arc::new(RecordingDiagnosticsSink::default());
    let reporter = DiagnosticsReporter::new(3, sink.clone());
    let store = ContainerStore::new();

    for key in 1..=5 {
        insert_and_report(&store, &reporter, key);
    }

    let warnings: Vec<DiagnosticsEvent> = sink
        .events()
        .into_iter()
        .filter(|event| matches!(event, DiagnosticsEvent::TooManyContainers { .. }))
        .collect();
    assert_eq!(warnings, vec![DiagnosticsEvent::TooManyContainers { count: 3 }]);
}

#[test]
fn test_threshold_of_one_warns_on_first_container() {
    let sink = Arc::new(RecordingDiagnosticsSink::default());
    let reporter = DiagnosticsReporter::new(1, sink.clone());
    let store = ContainerStore::new();

    insert_and_report(&store, &reporter, 1);

    assert_eq!(
        sink.events(),
        vec![
            DiagnosticsEvent::FirstContainer,
            DiagnosticsEvent::TooManyContainers { count: 1 },
        ]
    );
}

#[test]
fn test_container_registered_sink_is_preferred() {
    let fallback = Arc::new(RecordingDiagnosticsSink::default());
    let own = Arc::new(RecordingDiagnosticsSink::default());
    let reporter = DiagnosticsReporter::new(20, fallback.clone());
    let store = ContainerStore::new();

    let sink: Arc<dyn DiagnosticsSink> = own.clone();
    let registrations: RegistrationSet = [Registration::with_default_lifetime(
        Implementation::instance::<dyn DiagnosticsSink>("RecordingDiagnosticsSink", sink),
    )]
    .into_iter()
    .collect();
    insert_container_and_report(&store, &reporter, 1, container(registrations));

    assert_eq!(own.events(), vec![DiagnosticsEvent::FirstContainer]);
    assert!(fallback.events().is_empty());
}

#[test]
fn test_default_reporter_uses_default_threshold() {
    let reporter = DiagnosticsReporter::default();
    assert_eq!(
        reporter.warning_threshold(),
        spc_domain::constants::DEFAULT_CONTAINER_WARNING_THRESHOLD
    );
}

#[test]
fn test_tracing_sink_handles_every_signal() {
    let sink = TracingDiagnosticsSink::new();
    let first = container(RegistrationSet::new());
    let second = container(RegistrationSet::new());

    let mut current = DebugSnapshot::new();
    current.insert("value", "2");
    let mut previous = DebugSnapshot::new();
    previous.insert("value", "1");

    sink.on_first_container_created(&first);
    sink.on_debug_info(&current, &[previous]);
    sink.on_debug_info(&current, &[]);
    sink.on_too_many_containers(&[first, second]);
}
