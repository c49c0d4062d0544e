//! Port traits implemented by collaborators of the cache

pub mod container;
pub mod diagnostics;
pub mod fragment;
pub mod initializer;

pub use container::{
    Container, ContainerBackend, ContainerId, Instance, ResolverExt, ServiceResolver, ServiceScope,
};
pub use diagnostics::DiagnosticsSink;
pub use fragment::{ConfigFragment, type_identity_hash};
pub use initializer::{CoreServicesBootstrap, SingletonOptions, SingletonOptionsInitializer};
