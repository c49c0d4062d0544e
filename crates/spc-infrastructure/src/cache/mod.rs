//! Container cache engine
//!
//! | Module | Role |
//! |--------|------|
//! | [`fingerprint`] | Order-independent key of a fragment set |
//! | [`validation`] | Per-fragment validation before any build |
//! | [`merger`] | Fragment registrations + core fallback + replacements |
//! | [`builder`] | Container instantiation and eager singleton initialization |
//! | [`store`] | Build-once fingerprint → container map |
//! | [`diagnostics`] | First-container, snapshot and overcrowding signals |
//! | [`provider_cache`] | [`ServiceProviderCache`], the entry point |

pub mod builder;
pub mod diagnostics;
pub mod fingerprint;
pub mod merger;
pub mod provider_cache;
pub mod store;
pub mod validation;

pub use diagnostics::{DiagnosticsReporter, TracingDiagnosticsSink};
pub use fingerprint::fingerprint;
pub use merger::{MergedRegistrations, merge};
pub use provider_cache::{ServiceProviderCache, ServiceProviderCacheBuilder};
pub use store::{CacheEntry, ContainerStore, StoreOutcome};
