//! Container port
//!
//! The cache treats the dependency-injection container as an opaque
//! collaborator: something that accepts a [`RegistrationSet`], resolves
//! components by declared capability and opens disposable child scopes.
//!
//! ```text
//! RegistrationSet ──► ContainerBackend::build ──► Arc<dyn Container>
//!                                                    │
//!                                   resolve::<dyn T>()  create_scope()
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::value_objects::{RegistrationSet, ServiceType};

/// Type-erased service instance
///
/// An instance registered for service `S` always holds an `Arc<S>`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Unique identifier of a built container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(Uuid);

impl ContainerId {
    /// Generate a new random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Resolves service instances by service type
pub trait ServiceResolver: Send + Sync {
    /// Resolve the instance of the last registration for the service
    fn resolve_service(&self, service: &ServiceType) -> Result<Instance>;

    /// Resolve one instance per registration of the service, in order
    fn resolve_all_services(&self, service: &ServiceType) -> Result<Vec<Instance>>;

    /// Whether the service has at least one registration
    fn is_registered(&self, service: &ServiceType) -> bool;
}

/// Typed resolution helpers for any [`ServiceResolver`]
///
/// # Example
///
/// ```ignore
/// let greeter: Arc<dyn Greeter> = container.resolve::<dyn Greeter>()?;
/// let sink = scope.try_resolve::<dyn DiagnosticsSink>()?;
/// ```
pub trait ResolverExt: ServiceResolver {
    /// Resolve a service, failing when it is not registered
    fn resolve<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<S>> {
        let service = ServiceType::of::<S>();
        let instance = self.resolve_service(&service)?;
        downcast::<S>(&service, &instance)
    }

    /// Resolve a service, returning `None` when it is not registered
    fn try_resolve<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<S>>> {
        let service = ServiceType::of::<S>();
        if !self.is_registered(&service) {
            return Ok(None);
        }
        let instance = self.resolve_service(&service)?;
        downcast::<S>(&service, &instance).map(Some)
    }

    /// Resolve every registration of a service
    fn resolve_all<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Vec<Arc<S>>> {
        let service = ServiceType::of::<S>();
        self.resolve_all_services(&service)?
            .iter()
            .map(|instance| downcast::<S>(&service, instance))
            .collect()
    }
}

impl<R: ServiceResolver + ?Sized> ResolverExt for R {}

fn downcast<S: ?Sized + Send + Sync + 'static>(
    service: &ServiceType,
    instance: &Instance,
) -> Result<Arc<S>> {
    (**instance)
        .downcast_ref::<Arc<S>>()
        .cloned()
        .ok_or_else(|| Error::service_type_mismatch(service.name()))
}

/// Short-lived child context of a container
///
/// Scoped instances live until the scope is dropped.
pub trait ServiceScope: ServiceResolver {}

/// Instantiated, thread-safe container
pub trait Container: ServiceResolver {
    /// Identifier used in diagnostics
    fn id(&self) -> ContainerId;

    /// Open a disposable child scope
    fn create_scope(&self) -> Box<dyn ServiceScope>;
}

/// Builds containers from finished registration sets
pub trait ContainerBackend: Send + Sync {
    /// Instantiate a container
    fn build(&self, registrations: RegistrationSet) -> Result<Arc<dyn Container>>;
}
