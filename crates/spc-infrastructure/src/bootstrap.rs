//! Composition root
//!
//! Creates the process-wide [`ServiceProviderCache`]. Call once at startup
//! and pass the returned `Arc` to every component that requests containers;
//! the cache is never reset.
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! init_logging(&config.logging)?;
//! let cache = init_cache(&config)?;
//!
//! let container = cache.get_or_add(&configuration)?;
//! let clock: Arc<dyn Clock> = container.resolve()?;
//! ```

use std::sync::Arc;

use spc_domain::error::Result;
use tracing::info;

use crate::cache::ServiceProviderCache;
use crate::config::{AppConfig, validate_app_config};

/// Create the shared container cache from validated settings
pub fn init_cache(config: &AppConfig) -> Result<Arc<ServiceProviderCache>> {
    validate_app_config(config)?;

    let cache = ServiceProviderCache::new(&config.cache);
    info!(
        caching_enabled = config.cache.enabled,
        warning_threshold = config.cache.warning_threshold,
        "Service provider cache initialized"
    );
    Ok(Arc::new(cache))
}
