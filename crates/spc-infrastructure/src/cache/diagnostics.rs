//! Diagnostics reporter
//!
//! After every successful build the reporter hands the new container's
//! snapshot to a [`DiagnosticsSink`]. Once the store reaches the warning
//! threshold it raises a single overcrowding warning: many distinct
//! containers usually mean fragment hashes are unstable or a new
//! configuration is assembled per request.

use std::sync::Arc;

use spc_domain::constants::DEFAULT_CONTAINER_WARNING_THRESHOLD;
use spc_domain::ports::{Container, DiagnosticsSink};
use spc_domain::value_objects::{DebugSnapshot, Fingerprint};
use tracing::{debug, info, warn};

use crate::cache::builder::with_diagnostics_sink;
use crate::cache::store::{CacheEntry, ContainerStore};

/// Emits construction signals for freshly cached containers
pub struct DiagnosticsReporter {
    warning_threshold: usize,
    fallback: Arc<dyn DiagnosticsSink>,
}

impl DiagnosticsReporter {
    /// Create a reporter
    ///
    /// `fallback` receives the signals of containers that do not register
    /// their own sink.
    pub fn new(warning_threshold: usize, fallback: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            warning_threshold,
            fallback,
        }
    }

    /// Threshold at which the overcrowding warning fires
    pub fn warning_threshold(&self) -> usize {
        self.warning_threshold
    }

    /// Report a container that was just inserted into the store
    ///
    /// `previous_len` is the number of cached containers before the insert.
    pub fn report(
        &self,
        store: &ContainerStore,
        fingerprint: Fingerprint,
        entry: &CacheEntry,
        previous_len: usize,
    ) {
        let container = entry.container();
        with_diagnostics_sink(container, &self.fallback, |sink| {
            if previous_len == 0 {
                sink.on_first_container_created(container);
            } else {
                let prior: Vec<DebugSnapshot> = store
                    .entries()
                    .into_iter()
                    .filter(|(key, _)| *key != fingerprint)
                    .map(|(_, cached)| cached.snapshot().clone())
                    .collect();
                sink.on_debug_info(entry.snapshot(), &prior);
            }

            if previous_len + 1 == self.warning_threshold {
                sink.on_too_many_containers(&store.containers());
            }
        });
    }
}

impl Default for DiagnosticsReporter {
    fn default() -> Self {
        Self::new(
            DEFAULT_CONTAINER_WARNING_THRESHOLD,
            Arc::new(TracingDiagnosticsSink::new()),
        )
    }
}

/// Renders construction signals as `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnosticsSink;

impl TracingDiagnosticsSink {
    /// Create the sink
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticsSink for TracingDiagnosticsSink {
    fn on_first_container_created(&self, container: &Arc<dyn Container>) {
        info!(container_id = %container.id(), "First service container created");
    }

    fn on_debug_info(&self, snapshot: &DebugSnapshot, prior: &[DebugSnapshot]) {
        let changed = prior
            .iter()
            .map(|previous| snapshot.diff(previous))
            .min_by_key(Vec::len)
            .map(|labels| labels.join(", "))
            .unwrap_or_default();

        debug!(
            snapshot = %serde_json::to_string(snapshot).unwrap_or_default(),
            prior = prior.len(),
            changed = %changed,
            "Service container created for a new configuration"
        );
    }

    fn on_too_many_containers(&self, containers: &[Arc<dyn Container>]) {
        let ids: Vec<String> = containers.iter().map(|c| c.id().to_string()).collect();
        warn!(
            containers = containers.len(),
            ids = %ids.join(", "),
            "Many service containers have been created; the configuration fingerprint is \
             probably unstable or a new configuration is built per request"
        );
    }
}
