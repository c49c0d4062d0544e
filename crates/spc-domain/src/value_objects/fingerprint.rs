//! Cache key value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::EMPTY_FINGERPRINT;

/// Deterministic 64-bit key representing a set of configuration fragments
///
/// Two configurations with the same fingerprint share one container. The key
/// is a lossy hash, not a structural comparison: collisions are accepted as
/// statistically negligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprint of a configuration with no fragments
    pub const EMPTY: Self = Self(EMPTY_FINGERPRINT);

    /// Wrap a raw hash value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw hash value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Fingerprint {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
