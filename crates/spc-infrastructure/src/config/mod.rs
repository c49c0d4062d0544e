//! Configuration management
//!
//! Settings for the container cache and logging, loaded with Figment from
//! defaults, an optional `spc.toml` and `SPC_`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, validate_app_config};
pub use types::{AppConfig, CacheConfig, LoggingConfig};
