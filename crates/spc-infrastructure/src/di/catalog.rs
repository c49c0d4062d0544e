//! Catalog - in-process container backend
//!
//! Default implementation of the container port. A [`Catalog`] is built from
//! a finished [`RegistrationSet`] and resolves services according to each
//! registration's lifetime:
//!
//! ```text
//! Singleton ──► one OnceCell per registration, shared by every scope
//! Scoped    ──► one OnceCell per registration per scope (the root is a scope too)
//! Transient ──► factory runs on every resolution
//! ```
//!
//! Resolution is lock-free once an instance exists; concurrent first
//! resolution of a singleton runs its factory once. Registrations must not be
//! cyclic.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use spc_domain::error::{Error, Result};
use spc_domain::ports::{
    Container, ContainerBackend, ContainerId, Instance, ServiceResolver, ServiceScope,
};
use spc_domain::value_objects::{Lifetime, Registration, RegistrationSet, ServiceType};
use tracing::debug;

/// Builds [`Catalog`] containers
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogBackend;

impl CatalogBackend {
    /// Create the backend
    pub fn new() -> Self {
        Self
    }
}

impl ContainerBackend for CatalogBackend {
    fn build(&self, registrations: RegistrationSet) -> Result<Arc<dyn Container>> {
        Ok(Arc::new(Catalog::new(registrations)))
    }
}

struct CatalogInner {
    id: ContainerId,
    registrations: Vec<Registration>,
    index: HashMap<ServiceType, Vec<usize>>,
    singletons: Vec<OnceCell<Instance>>,
    root_scoped: Vec<OnceCell<Instance>>,
}

impl CatalogInner {
    fn root(&self) -> ScopeView<'_> {
        ScopeView {
            catalog: self,
            scoped: &self.root_scoped,
        }
    }
}

fn empty_cells(len: usize) -> Vec<OnceCell<Instance>> {
    std::iter::repeat_with(OnceCell::new).take(len).collect()
}

/// Resolution context: the catalog plus the scoped instances of one scope
struct ScopeView<'a> {
    catalog: &'a CatalogInner,
    scoped: &'a [OnceCell<Instance>],
}

impl ScopeView<'_> {
    fn activate(&self, index: usize) -> Result<Instance> {
        let registration = &self.catalog.registrations[index];
        let implementation = registration.implementation();
        match registration.lifetime() {
            Lifetime::Singleton => self.catalog.singletons[index]
                .get_or_try_init(|| implementation.create(&self.catalog.root()))
                .cloned(),
            Lifetime::Scoped => self.scoped[index]
                .get_or_try_init(|| implementation.create(self))
                .cloned(),
            Lifetime::Transient => implementation.create(self),
        }
    }

    fn indices(&self, service: &ServiceType) -> Result<&[usize]> {
        self.catalog
            .index
            .get(service)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::service_not_registered(service.name()))
    }
}

impl ServiceResolver for ScopeView<'_> {
    fn resolve_service(&self, service: &ServiceType) -> Result<Instance> {
        let indices = self.indices(service)?;
        match indices.last() {
            Some(&index) => self.activate(index),
            None => Err(Error::service_not_registered(service.name())),
        }
    }

    fn resolve_all_services(&self, service: &ServiceType) -> Result<Vec<Instance>> {
        match self.catalog.index.get(service) {
            Some(indices) => indices.iter().map(|&index| self.activate(index)).collect(),
            None => Ok(Vec::new()),
        }
    }

    fn is_registered(&self, service: &ServiceType) -> bool {
        self.catalog.index.contains_key(service)
    }
}

/// Container built from a registration set
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

impl Catalog {
    /// Instantiate a catalog
    pub fn new(registrations: RegistrationSet) -> Self {
        let registrations: Vec<Registration> = registrations.into_iter().collect();
        let mut index: HashMap<ServiceType, Vec<usize>> = HashMap::new();
        for (position, registration) in registrations.iter().enumerate() {
            index
                .entry(registration.service())
                .or_default()
                .push(position);
        }

        let inner = CatalogInner {
            id: ContainerId::new(),
            singletons: empty_cells(registrations.len()),
            root_scoped: empty_cells(registrations.len()),
            registrations,
            index,
        };
        debug!(
            container_id = %inner.id,
            registrations = inner.registrations.len(),
            services = inner.index.len(),
            "Catalog built"
        );

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Number of registrations
    pub fn registration_count(&self) -> usize {
        self.inner.registrations.len()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("id", &self.inner.id)
            .field("registrations", &self.inner.registrations.len())
            .finish()
    }
}

impl ServiceResolver for Catalog {
    fn resolve_service(&self, service: &ServiceType) -> Result<Instance> {
        self.inner.root().resolve_service(service)
    }

    fn resolve_all_services(&self, service: &ServiceType) -> Result<Vec<Instance>> {
        self.inner.root().resolve_all_services(service)
    }

    fn is_registered(&self, service: &ServiceType) -> bool {
        self.inner.index.contains_key(service)
    }
}

impl Container for Catalog {
    fn id(&self) -> ContainerId {
        self.inner.id
    }

    fn create_scope(&self) -> Box<dyn ServiceScope> {
        Box::new(CatalogScope {
            scoped: empty_cells(self.inner.registrations.len()),
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Child scope of a [`Catalog`]
///
/// Scoped instances are released when the scope is dropped.
struct CatalogScope {
    inner: Arc<CatalogInner>,
    scoped: Vec<OnceCell<Instance>>,
}

impl CatalogScope {
    fn view(&self) -> ScopeView<'_> {
        ScopeView {
            catalog: &self.inner,
            scoped: &self.scoped,
        }
    }
}

impl ServiceResolver for CatalogScope {
    fn resolve_service(&self, service: &ServiceType) -> Result<Instance> {
        self.view().resolve_service(service)
    }

    fn resolve_all_services(&self, service: &ServiceType) -> Result<Vec<Instance>> {
        self.view().resolve_all_services(service)
    }

    fn is_registered(&self, service: &ServiceType) -> bool {
        self.inner.index.contains_key(service)
    }
}

impl ServiceScope for CatalogScope {}
