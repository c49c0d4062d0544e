//! Configuration fragment port
//!
//! Fragments are the pluggable pieces a configuration is assembled from.
//! The set of fragment kinds is open: the cache only ever talks to them
//! through [`ConfigFragment`].

use crate::configuration::Configuration;
use crate::constants::FINGERPRINT_MULTIPLIER;
use crate::error::Result;
use crate::value_objects::{DebugSnapshot, RegistrationSet};

/// Stable hash of a fragment's type identity
///
/// Derived from the type name so it does not change between runs.
pub fn type_identity_hash(type_name: &str) -> u64 {
    seahash::hash(type_name.as_bytes())
}

/// A pluggable piece of configuration
pub trait ConfigFragment: Send + Sync {
    /// Stable type identity, used to order fragments and as part of the key
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Add this fragment's registrations
    ///
    /// Returns `true` when the fragment supplied the core registrations
    /// (including a singleton options initializer).
    fn contribute_registrations(&self, registrations: &mut RegistrationSet) -> bool;

    /// Check this fragment against the full configuration
    fn validate(&self, _configuration: &Configuration) -> Result<()> {
        Ok(())
    }

    /// Describe this fragment for container diagnostics
    fn populate_debug_info(&self, _debug_info: &mut DebugSnapshot) {}

    /// Hash of every field that changes the container this fragment produces
    ///
    /// Fragments that differ only in fields irrelevant to construction must
    /// return the same value, otherwise the cache stops sharing containers.
    fn content_hash(&self) -> u64;

    /// Contribution of this fragment to the configuration fingerprint
    fn service_provider_hash_code(&self) -> u64 {
        type_identity_hash(self.type_name()).wrapping_mul(FINGERPRINT_MULTIPLIER)
            ^ self.content_hash()
    }
}
