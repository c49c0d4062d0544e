//! # Domain Layer
//!
//! Core types and port traits of the service provider cache.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`configuration`] | Immutable configuration assembled from fragments |
//! | [`value_objects`] | Fingerprints, registrations, replacement maps, debug snapshots |
//! | [`ports`] | Fragment, container, diagnostics and initializer traits |
//! | [`error`] | Error taxonomy shared by every layer |
//! | [`constants`] | Keying and growth-signal constants |

pub mod configuration;
pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

// Re-export commonly used types
pub use configuration::{Configuration, ConfigurationBuilder};
pub use error::{Error, Result};
pub use ports::{
    ConfigFragment, Container, ContainerBackend, ContainerId, CoreServicesBootstrap,
    DiagnosticsSink, Instance, ResolverExt, ServiceResolver, ServiceScope, SingletonOptions,
    SingletonOptionsInitializer,
};
pub use value_objects::{
    DebugSnapshot, Fingerprint, Implementation, Lifetime, Registration, RegistrationSet,
    ReplacementMap, ServiceType,
};
