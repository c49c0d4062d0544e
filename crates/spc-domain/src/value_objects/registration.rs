//! Service registrations
//!
//! A registration is a `(service type, implementation, lifetime)` triple
//! describing how a container constructs a component. Fragments contribute
//! registrations to a [`RegistrationSet`]; a [`ReplacementMap`] patches the
//! implementation of already-registered services.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ports::container::{Instance, ServiceResolver};

// ============================================================================
// Service Type
// ============================================================================

/// Identity of a service capability
///
/// Usually a trait object type (`dyn Trait`), but any `'static` type works.
/// Equality and hashing use the [`TypeId`]; the name is kept for diagnostics.
#[derive(Clone, Copy)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
}

impl ServiceType {
    /// Service type for `S`
    pub fn of<S: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
        }
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Underlying type identity
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceType").field(&self.name).finish()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// Lifetime
// ============================================================================

/// How long a constructed instance is reused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// One instance per container
    Singleton,
    /// One instance per scope
    Scoped,
    /// A new instance on every resolution
    #[default]
    Transient,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Implementation
// ============================================================================

type Factory = dyn Fn(&dyn ServiceResolver) -> Result<Instance> + Send + Sync;

/// Named factory producing instances of one service type
///
/// The factory receives the resolver of the scope performing the resolution,
/// so implementations can pull their own dependencies from the container.
#[derive(Clone)]
pub struct Implementation {
    service: ServiceType,
    name: &'static str,
    default_lifetime: Lifetime,
    factory: Arc<Factory>,
}

impl Implementation {
    /// Create an implementation of `S` from a factory
    ///
    /// The declared default lifetime is [`Lifetime::Transient`].
    pub fn new<S, F>(name: &'static str, factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> Result<Arc<S>> + Send + Sync + 'static,
    {
        Self {
            service: ServiceType::of::<S>(),
            name,
            default_lifetime: Lifetime::Transient,
            factory: Arc::new(move |resolver: &dyn ServiceResolver| {
                factory(resolver).map(|service| Arc::new(service) as Instance)
            }),
        }
    }

    /// Implementation that always hands out the given instance
    ///
    /// The declared default lifetime is [`Lifetime::Singleton`].
    pub fn instance<S>(name: &'static str, value: Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        Self::new::<S, _>(name, move |_| Ok(Arc::clone(&value)))
            .with_default_lifetime(Lifetime::Singleton)
    }

    /// Override the declared default lifetime
    pub fn with_default_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.default_lifetime = lifetime;
        self
    }

    /// Service type this implementation provides
    pub fn service(&self) -> ServiceType {
        self.service
    }

    /// Implementation name used in diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Lifetime used when registered without an explicit one
    pub fn default_lifetime(&self) -> Lifetime {
        self.default_lifetime
    }

    /// Construct a new instance
    pub fn create(&self, resolver: &dyn ServiceResolver) -> Result<Instance> {
        (self.factory)(resolver)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("service", &self.service)
            .field("name", &self.name)
            .field("default_lifetime", &self.default_lifetime)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registration
// ============================================================================

/// A service type bound to an implementation with a lifetime policy
#[derive(Debug, Clone)]
pub struct Registration {
    implementation: Implementation,
    lifetime: Lifetime,
}

impl Registration {
    /// Register an implementation with an explicit lifetime
    pub fn new(implementation: Implementation, lifetime: Lifetime) -> Self {
        Self {
            implementation,
            lifetime,
        }
    }

    /// Register an implementation with its declared default lifetime
    pub fn with_default_lifetime(implementation: Implementation) -> Self {
        let lifetime = implementation.default_lifetime();
        Self::new(implementation, lifetime)
    }

    /// Singleton registration of `S`
    pub fn singleton<S, F>(name: &'static str, factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> Result<Arc<S>> + Send + Sync + 'static,
    {
        Self::new(Implementation::new::<S, F>(name, factory), Lifetime::Singleton)
    }

    /// Scoped registration of `S`
    pub fn scoped<S, F>(name: &'static str, factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> Result<Arc<S>> + Send + Sync + 'static,
    {
        Self::new(Implementation::new::<S, F>(name, factory), Lifetime::Scoped)
    }

    /// Transient registration of `S`
    pub fn transient<S, F>(name: &'static str, factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> Result<Arc<S>> + Send + Sync + 'static,
    {
        Self::new(Implementation::new::<S, F>(name, factory), Lifetime::Transient)
    }

    /// Registered service type
    pub fn service(&self) -> ServiceType {
        self.implementation.service()
    }

    /// Bound implementation
    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    /// Lifetime policy
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Same registration bound to another implementation, keeping the lifetime
    pub fn replaced_by(&self, implementation: &Implementation) -> Self {
        Self::new(implementation.clone(), self.lifetime)
    }
}

// ============================================================================
// Registration Set
// ============================================================================

/// Ordered collection of registrations
///
/// The last registration of a service wins when a single instance is
/// resolved; resolving all instances yields every registration in order.
#[derive(Debug, Clone, Default)]
pub struct RegistrationSet {
    entries: Vec<Registration>,
}

impl RegistrationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration
    pub fn add(&mut self, registration: Registration) -> &mut Self {
        self.entries.push(registration);
        self
    }

    /// Append a registration unless its service is already registered
    ///
    /// Returns whether the registration was added.
    pub fn try_add(&mut self, registration: Registration) -> bool {
        if self.contains(&registration.service()) {
            return false;
        }
        self.entries.push(registration);
        true
    }

    /// Whether any registration exists for the service
    pub fn contains(&self, service: &ServiceType) -> bool {
        self.entries.iter().any(|entry| entry.service() == *service)
    }

    /// Registration used for single resolution of the service
    pub fn last_for(&self, service: &ServiceType) -> Option<&Registration> {
        self.entries.iter().rev().find(|entry| entry.service() == *service)
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no registrations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over registrations in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Registration> {
        self.entries.iter()
    }

    /// New set where every registration of a replaced service is bound to the
    /// replacement implementation with its original lifetime
    ///
    /// Replacements for services absent from this set are ignored.
    pub fn replace_with(&self, replacements: &ReplacementMap) -> RegistrationSet {
        let entries = self
            .entries
            .iter()
            .map(|entry| match replacements.get(&entry.service()) {
                Some(replacement) => entry.replaced_by(replacement),
                None => entry.clone(),
            })
            .collect();
        RegistrationSet { entries }
    }
}

impl IntoIterator for RegistrationSet {
    type Item = Registration;
    type IntoIter = std::vec::IntoIter<Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a RegistrationSet {
    type Item = &'a Registration;
    type IntoIter = std::slice::Iter<'a, Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Registration> for RegistrationSet {
    fn from_iter<I: IntoIterator<Item = Registration>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Replacement Map
// ============================================================================

/// Service type → replacement implementation
///
/// Replacement is a narrow patch over existing registrations, not a way to
/// add new ones.
#[derive(Debug, Clone, Default)]
pub struct ReplacementMap {
    entries: HashMap<ServiceType, Implementation>,
}

impl ReplacementMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the service provided by `implementation`
    ///
    /// Returns the previous replacement for that service, if any.
    pub fn insert(&mut self, implementation: Implementation) -> Option<Implementation> {
        self.entries.insert(implementation.service(), implementation)
    }

    /// Builder-style [`ReplacementMap::insert`]
    pub fn with(mut self, implementation: Implementation) -> Self {
        self.insert(implementation);
        self
    }

    /// Replacement for a service
    pub fn get(&self, service: &ServiceType) -> Option<&Implementation> {
        self.entries.get(service)
    }

    /// Whether a replacement exists for a service
    pub fn contains(&self, service: &ServiceType) -> bool {
        self.entries.contains_key(service)
    }

    /// Replaced service types
    pub fn services(&self) -> impl Iterator<Item = &ServiceType> {
        self.entries.keys()
    }

    /// Number of replacements
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
