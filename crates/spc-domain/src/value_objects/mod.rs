//! Value objects shared by the cache engine and its collaborators

pub mod debug_snapshot;
pub mod fingerprint;
pub mod registration;

pub use debug_snapshot::DebugSnapshot;
pub use fingerprint::Fingerprint;
pub use registration::{
    Implementation, Lifetime, Registration, RegistrationSet, ReplacementMap, ServiceType,
};
