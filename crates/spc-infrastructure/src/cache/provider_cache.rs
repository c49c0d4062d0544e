//! Service provider cache
//!
//! Entry point of the engine. One instance is created at the composition
//! root and shared (`Arc<ServiceProviderCache>`) by every caller that needs
//! a container; it lives for the rest of the process.
//!
//! ```text
//! get_or_add(configuration)
//!   validate ─┬─ external container ──► ensure_initialized ──► return it
//!             ├─ caching disabled ────► merge ► build ─────────► return new container
//!             └─ fingerprint ► store ─┬─ hit ──────────────────► return cached
//!                                     └─ miss ► merge ► build ► insert ► report ► return
//! ```

use std::sync::Arc;

use spc_domain::Configuration;
use spc_domain::error::Result;
use spc_domain::ports::{Container, ContainerBackend, CoreServicesBootstrap, DiagnosticsSink};
use spc_domain::value_objects::Fingerprint;
use tracing::{debug, info};

use crate::cache::builder;
use crate::cache::diagnostics::{DiagnosticsReporter, TracingDiagnosticsSink};
use crate::cache::fingerprint::fingerprint;
use crate::cache::merger;
use crate::cache::store::{CacheEntry, ContainerStore};
use crate::cache::validation;
use crate::config::CacheConfig;
use crate::di::{CatalogBackend, DefaultCoreServices};

/// Build-once cache of containers keyed by configuration fingerprint
pub struct ServiceProviderCache {
    store: ContainerStore,
    backend: Arc<dyn ContainerBackend>,
    core_services: Arc<dyn CoreServicesBootstrap>,
    reporter: DiagnosticsReporter,
    caching_enabled: bool,
}

impl ServiceProviderCache {
    /// Create a cache with the default backend and core services
    pub fn new(config: &CacheConfig) -> Self {
        Self::builder().with_config(config).build()
    }

    /// Start building a cache with custom collaborators
    pub fn builder() -> ServiceProviderCacheBuilder {
        ServiceProviderCacheBuilder::default()
    }

    /// Return the container for a configuration, building it at most once
    /// per fingerprint
    pub fn get_or_add(&self, configuration: &Configuration) -> Result<Arc<dyn Container>> {
        validation::validate(configuration)?;

        if let Some(container) = configuration.external_container() {
            builder::ensure_initialized(container, configuration)?;
            debug!(container_id = %container.id(), "Using external service container");
            return Ok(Arc::clone(container));
        }

        if !(self.caching_enabled && configuration.caching_enabled()) {
            let container = self.build_container(configuration)?;
            debug!(container_id = %container.id(), "Built uncached service container");
            return Ok(container);
        }

        let fingerprint = fingerprint(configuration.fragments());
        let outcome = self.store.get_or_build(fingerprint, || {
            let container = self.build_container(configuration)?;
            Ok(CacheEntry::new(
                container,
                builder::debug_snapshot(configuration),
            ))
        })?;

        if let Some(previous_len) = outcome.inserted_after {
            info!(
                %fingerprint,
                container_id = %outcome.entry.container().id(),
                entries = previous_len + 1,
                "Service container cached"
            );
            self.reporter
                .report(&self.store, fingerprint, &outcome.entry, previous_len);
        }

        Ok(Arc::clone(outcome.entry.container()))
    }

    /// Fingerprint the cache would use for a configuration
    pub fn fingerprint_of(&self, configuration: &Configuration) -> Fingerprint {
        fingerprint(configuration.fragments())
    }

    /// Cached container for a fingerprint, if any
    pub fn get(&self, fingerprint: Fingerprint) -> Option<Arc<dyn Container>> {
        self.store
            .get(fingerprint)
            .map(|entry| Arc::clone(entry.container()))
    }

    /// Number of cached containers
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no container has been cached yet
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Whether caching is enabled for this cache
    pub fn caching_enabled(&self) -> bool {
        self.caching_enabled
    }

    fn build_container(&self, configuration: &Configuration) -> Result<Arc<dyn Container>> {
        let merged = merger::merge(configuration, self.core_services.as_ref());
        builder::build(merged, configuration, self.backend.as_ref())
    }
}

impl Default for ServiceProviderCache {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServiceProviderCache`]
pub struct ServiceProviderCacheBuilder {
    backend: Arc<dyn ContainerBackend>,
    core_services: Option<Arc<dyn CoreServicesBootstrap>>,
    diagnostics: Option<Arc<dyn DiagnosticsSink>>,
    warning_threshold: usize,
    caching_enabled: bool,
}

impl Default for ServiceProviderCacheBuilder {
    fn default() -> Self {
        let config = CacheConfig::default();
        Self {
            backend: Arc::new(CatalogBackend::new()),
            core_services: None,
            diagnostics: None,
            warning_threshold: config.warning_threshold,
            caching_enabled: config.enabled,
        }
    }
}

impl ServiceProviderCacheBuilder {
    /// Apply cache settings
    pub fn with_config(mut self, config: &CacheConfig) -> Self {
        self.warning_threshold = config.warning_threshold;
        self.caching_enabled = config.enabled;
        self
    }

    /// Use another container backend
    pub fn with_backend(mut self, backend: Arc<dyn ContainerBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Use another core services bootstrap
    ///
    /// A custom bootstrap decides itself which diagnostics sink containers
    /// get; the sink from [`with_diagnostics_sink`](Self::with_diagnostics_sink)
    /// then only serves containers that register none.
    pub fn with_core_services(mut self, core_services: Arc<dyn CoreServicesBootstrap>) -> Self {
        self.core_services = Some(core_services);
        self
    }

    /// Sink receiving construction signals
    ///
    /// With the default core services it is registered in every container
    /// whose fragments do not supply their own sink, and it also serves
    /// containers without any sink.
    pub fn with_diagnostics_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Number of cached containers at which the overcrowding warning fires
    pub fn with_warning_threshold(mut self, threshold: usize) -> Self {
        self.warning_threshold = threshold;
        self
    }

    /// Enable or disable caching for every configuration
    pub fn caching_enabled(mut self, enabled: bool) -> Self {
        self.caching_enabled = enabled;
        self
    }

    /// Finish the cache
    pub fn build(self) -> ServiceProviderCache {
        let core_services: Arc<dyn CoreServicesBootstrap> =
            match (self.core_services, &self.diagnostics) {
                (Some(core_services), _) => core_services,
                (None, Some(sink)) => Arc::new(DefaultCoreServices::with_diagnostics_sink(
                    Arc::clone(sink),
                )),
                (None, None) => Arc::new(DefaultCoreServices::new()),
            };
        let fallback: Arc<dyn DiagnosticsSink> = match self.diagnostics {
            Some(sink) => sink,
            None => Arc::new(TracingDiagnosticsSink::new()),
        };

        ServiceProviderCache {
            store: ContainerStore::new(),
            backend: self.backend,
            core_services,
            reporter: DiagnosticsReporter::new(self.warning_threshold, fallback),
            caching_enabled: self.caching_enabled,
        }
    }
}
