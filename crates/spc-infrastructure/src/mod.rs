//! # Infrastructure Layer
//!
//! Build-once container cache and the technical concerns around it.
//!
//! ## Module Categories
//!
//! ### Cache Engine
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Fingerprinting, validation, merging, building, store and diagnostics |
//! | [`bootstrap`] | Composition root creating the shared cache |
//!
//! ### Dependency Injection
//! | Module | Description |
//! |--------|-------------|
//! | [`di`] | Default in-process container backend and core services |
//!
//! ### Configuration & Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based settings loading |
//! | [`logging`] | Structured logging with tracing |
//! | [`constants`] | Centralized configuration constants |
//! | [`error_ext`] | Error context helpers |

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use bootstrap::init_cache;
pub use cache::{ServiceProviderCache, ServiceProviderCacheBuilder, TracingDiagnosticsSink};
pub use di::{Catalog, CatalogBackend, DefaultCoreServices, DefaultSingletonOptionsInitializer};
pub use error_ext::ErrorContext;
