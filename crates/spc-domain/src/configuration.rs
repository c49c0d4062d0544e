//! Configuration handed to the cache
//!
//! A [`Configuration`] is assembled once through [`ConfigurationBuilder`] and
//! is immutable afterwards.

use std::fmt;
use std::sync::Arc;

use crate::ports::{ConfigFragment, Container};
use crate::value_objects::{Implementation, ReplacementMap};

/// Fragments plus the options that steer how the cache treats them
#[derive(Clone)]
pub struct Configuration {
    fragments: Vec<Arc<dyn ConfigFragment>>,
    replacements: Option<ReplacementMap>,
    external_container: Option<Arc<dyn Container>>,
    caching_enabled: bool,
}

impl Configuration {
    /// Start building a configuration
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Configuration fragments, in the order they were added
    pub fn fragments(&self) -> &[Arc<dyn ConfigFragment>] {
        &self.fragments
    }

    /// Service replacements applied while merging registrations
    pub fn replacements(&self) -> Option<&ReplacementMap> {
        self.replacements.as_ref()
    }

    /// Pre-built container supplied by the caller
    pub fn external_container(&self) -> Option<&Arc<dyn Container>> {
        self.external_container.as_ref()
    }

    /// Whether containers built for this configuration may be cached
    pub fn caching_enabled(&self) -> bool {
        self.caching_enabled
    }

    /// First fragment of the given type
    pub fn find_fragment(&self, type_name: &str) -> Option<&Arc<dyn ConfigFragment>> {
        self.fragments
            .iter()
            .find(|fragment| fragment.type_name() == type_name)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fragments: Vec<&str> = self
            .fragments
            .iter()
            .map(|fragment| fragment.type_name())
            .collect();
        f.debug_struct("Configuration")
            .field("fragments", &fragments)
            .field("replacements", &self.replacements.as_ref().map(ReplacementMap::len))
            .field(
                "external_container",
                &self.external_container.as_ref().map(|c| c.id()),
            )
            .field("caching_enabled", &self.caching_enabled)
            .finish()
    }
}

/// Builder for [`Configuration`]
///
/// # Example
///
/// ```ignore
/// let configuration = Configuration::builder()
///     .fragment(Arc::new(SqliteFragment::new("app.db")))
///     .replace(Implementation::new::<dyn Clock, _>("FixedClock", |_| Ok(clock.clone())))
///     .build();
/// ```
pub struct ConfigurationBuilder {
    fragments: Vec<Arc<dyn ConfigFragment>>,
    replacements: Option<ReplacementMap>,
    external_container: Option<Arc<dyn Container>>,
    caching_enabled: bool,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self {
            fragments: Vec::new(),
            replacements: None,
            external_container: None,
            caching_enabled: true,
        }
    }
}

impl ConfigurationBuilder {
    /// Add a fragment
    pub fn fragment(mut self, fragment: Arc<dyn ConfigFragment>) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Add several fragments
    pub fn fragments<I>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ConfigFragment>>,
    {
        self.fragments.extend(fragments);
        self
    }

    /// Replace the implementation of an already-registered service
    pub fn replace(mut self, implementation: Implementation) -> Self {
        self.replacements
            .get_or_insert_with(ReplacementMap::new)
            .insert(implementation);
        self
    }

    /// Use a full replacement map
    pub fn replacements(mut self, replacements: ReplacementMap) -> Self {
        self.replacements = Some(replacements);
        self
    }

    /// Use a pre-built container instead of building one
    pub fn external_container(mut self, container: Arc<dyn Container>) -> Self {
        self.external_container = Some(container);
        self
    }

    /// Enable or disable caching for this configuration
    pub fn caching_enabled(mut self, enabled: bool) -> Self {
        self.caching_enabled = enabled;
        self
    }

    /// Finish the configuration
    pub fn build(self) -> Configuration {
        Configuration {
            fragments: self.fragments,
            replacements: self.replacements,
            external_container: self.external_container,
            caching_enabled: self.caching_enabled,
        }
    }
}
