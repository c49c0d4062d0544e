//! Dependency Injection - default container backend
//!
//! The cache only depends on the container port defined in
//! `spc_domain::ports::container`. This module provides the in-process
//! implementation used when no other backend is configured.
//!
//! ```text
//! RegistrationSet ──► CatalogBackend::build ──► Catalog (Arc<dyn Container>)
//!                                                  └── create_scope() ──► CatalogScope
//! ```

pub mod catalog;
pub mod core_services;

pub use catalog::{Catalog, CatalogBackend};
pub use core_services::{DefaultCoreServices, DefaultSingletonOptionsInitializer};
