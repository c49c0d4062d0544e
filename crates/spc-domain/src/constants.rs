//! Domain constants
//!
//! Values that define cache keying and growth signalling. Infrastructure
//! defaults live in `spc_infrastructure::constants`.

/// Odd multiplier used to fold fragment hashes into a fingerprint
pub const FINGERPRINT_MULTIPLIER: u64 = 397;

/// Fingerprint of a configuration without fragments
pub const EMPTY_FINGERPRINT: u64 = 0;

/// Number of cached containers at which the overcrowding warning fires
pub const DEFAULT_CONTAINER_WARNING_THRESHOLD: usize = 20;
