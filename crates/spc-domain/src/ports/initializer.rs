//! Core service ports
//!
//! Containers built with core registrations carry a
//! [`SingletonOptionsInitializer`] that eagerly applies the configuration to
//! every configuration-dependent singleton.

use crate::configuration::Configuration;
use crate::error::Result;
use crate::ports::container::Container;
use crate::value_objects::RegistrationSet;

/// One-time eager initialization of configuration-dependent singletons
pub trait SingletonOptionsInitializer: Send + Sync {
    /// Initialize the container's singleton options from the configuration
    ///
    /// Must be idempotent: only the first call per container has an effect.
    fn ensure_initialized(&self, container: &dyn Container, configuration: &Configuration)
    -> Result<()>;
}

/// A singleton whose state is derived from the configuration
pub trait SingletonOptions: Send + Sync {
    /// Capture whatever the singleton needs from the configuration
    fn initialize(&self, configuration: &Configuration) -> Result<()>;
}

/// Supplies core registrations when no fragment provided them
pub trait CoreServicesBootstrap: Send + Sync {
    /// Add default core registrations for services not yet registered
    fn try_add_core_services(&self, registrations: &mut RegistrationSet);
}
