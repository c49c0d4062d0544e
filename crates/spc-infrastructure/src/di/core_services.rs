//! Default core services
//!
//! Registered by the merger when no fragment supplied core registrations,
//! and available to fragments that want to supply them explicitly.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use spc_domain::Configuration;
use spc_domain::error::Result;
use spc_domain::ports::{
    Container, CoreServicesBootstrap, DiagnosticsSink, ResolverExt, SingletonOptions,
    SingletonOptionsInitializer,
};
use spc_domain::value_objects::{Implementation, Lifetime, Registration, RegistrationSet};
use tracing::debug;

use crate::cache::diagnostics::TracingDiagnosticsSink;

/// Registers a diagnostics sink and the default initializer
///
/// Without a configured sink, containers get a scoped
/// [`TracingDiagnosticsSink`].
#[derive(Clone, Default)]
pub struct DefaultCoreServices {
    diagnostics: Option<Arc<dyn DiagnosticsSink>>,
}

impl DefaultCoreServices {
    /// Create the bootstrap
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sink` as every container's diagnostics sink
    pub fn with_diagnostics_sink(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            diagnostics: Some(sink),
        }
    }

    fn diagnostics_registration(&self) -> Registration {
        match &self.diagnostics {
            Some(sink) => Registration::new(
                Implementation::instance::<dyn DiagnosticsSink>(
                    "ConfiguredDiagnosticsSink",
                    Arc::clone(sink),
                ),
                Lifetime::Scoped,
            ),
            None => Registration::scoped::<dyn DiagnosticsSink, _>("TracingDiagnosticsSink", |_| {
                Ok(Arc::new(TracingDiagnosticsSink::new()) as Arc<dyn DiagnosticsSink>)
            }),
        }
    }
}

impl std::fmt::Debug for DefaultCoreServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultCoreServices")
            .field("configured_sink", &self.diagnostics.is_some())
            .finish()
    }
}

impl CoreServicesBootstrap for DefaultCoreServices {
    fn try_add_core_services(&self, registrations: &mut RegistrationSet) {
        registrations.try_add(self.diagnostics_registration());
        registrations.try_add(Registration::singleton::<dyn SingletonOptionsInitializer, _>(
            "DefaultSingletonOptionsInitializer",
            |_| {
                Ok(Arc::new(DefaultSingletonOptionsInitializer::new())
                    as Arc<dyn SingletonOptionsInitializer>)
            },
        ));
    }
}

/// Initializes every registered [`SingletonOptions`] exactly once
#[derive(Debug, Default)]
pub struct DefaultSingletonOptionsInitializer {
    initialized: OnceCell<()>,
}

impl DefaultSingletonOptionsInitializer {
    /// Create an initializer that has not run yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether initialization already completed
    pub fn is_initialized(&self) -> bool {
        self.initialized.get().is_some()
    }
}

impl SingletonOptionsInitializer for DefaultSingletonOptionsInitializer {
    fn ensure_initialized(
        &self,
        container: &dyn Container,
        configuration: &Configuration,
    ) -> Result<()> {
        self.initialized.get_or_try_init(|| {
            let options = container.resolve_all::<dyn SingletonOptions>()?;
            for option in &options {
                option.initialize(configuration)?;
            }
            debug!(
                container_id = %container.id(),
                options = options.len(),
                "Singleton options initialized"
            );
            Ok::<(), spc_domain::Error>(())
        })?;
        Ok(())
    }
}
