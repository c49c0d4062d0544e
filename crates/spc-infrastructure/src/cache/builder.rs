//! Container builder
//!
//! Turns merged registrations into a container and, when a fragment
//! supplied the core services, eagerly initializes the configuration-derived
//! singletons so no caller races on their first use.

use std::sync::Arc;

use spc_domain::Configuration;
use spc_domain::error::{Error, Result};
use spc_domain::ports::{
    Container, ContainerBackend, DiagnosticsSink, ResolverExt, SingletonOptionsInitializer,
};
use spc_domain::value_objects::DebugSnapshot;
use tracing::{debug, warn};

use crate::cache::merger::MergedRegistrations;

/// Instantiate a container from merged registrations
pub fn build(
    merged: MergedRegistrations,
    configuration: &Configuration,
    backend: &dyn ContainerBackend,
) -> Result<Arc<dyn Container>> {
    let container = backend
        .build(merged.registrations)
        .map_err(into_build_failure)?;

    if merged.core_present {
        ensure_initialized(&container, configuration)?;
    }

    debug!(
        container_id = %container.id(),
        core_present = merged.core_present,
        "Container built"
    );
    Ok(container)
}

/// Run the container's singleton options initializer
///
/// A container without an initializer was not built with the core services
/// and cannot be used; this is reported as
/// [`Error::MissingCoreInitializer`].
pub fn ensure_initialized(
    container: &Arc<dyn Container>,
    configuration: &Configuration,
) -> Result<()> {
    let initializer = container
        .try_resolve::<dyn SingletonOptionsInitializer>()
        .map_err(into_build_failure)?
        .ok_or_else(|| Error::missing_core_initializer(container.id().to_string()))?;

    initializer
        .ensure_initialized(container.as_ref(), configuration)
        .map_err(into_build_failure)
}

/// Collect every fragment's debug information
pub fn debug_snapshot(configuration: &Configuration) -> DebugSnapshot {
    let mut snapshot = DebugSnapshot::new();
    for fragment in configuration.fragments() {
        fragment.populate_debug_info(&mut snapshot);
    }
    snapshot
}

/// Hand the container's diagnostics sink to `report`
///
/// The sink is resolved from a short-lived child scope that is released as
/// soon as `report` returns. Containers without a sink use `fallback`.
pub fn with_diagnostics_sink<F>(
    container: &Arc<dyn Container>,
    fallback: &Arc<dyn DiagnosticsSink>,
    report: F,
) where
    F: FnOnce(&dyn DiagnosticsSink),
{
    let scope = container.create_scope();
    let sink = match scope.try_resolve::<dyn DiagnosticsSink>() {
        Ok(Some(sink)) => sink,
        Ok(None) => Arc::clone(fallback),
        Err(error) => {
            warn!(container_id = %container.id(), %error, "Diagnostics sink unavailable");
            Arc::clone(fallback)
        }
    };
    report(sink.as_ref());
    drop(scope);
}

fn into_build_failure(error: Error) -> Error {
    match error {
        Error::BuildFailure { .. }
        | Error::MissingCoreInitializer { .. }
        | Error::ConfigurationInvalid { .. } => error,
        other => Error::build_failure_with_source(other.to_string(), other),
    }
}
