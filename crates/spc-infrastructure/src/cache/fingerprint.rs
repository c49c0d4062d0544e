//! Fingerprint generator
//!
//! Folds an unordered set of fragments into a [`Fingerprint`]:
//!
//! ```text
//! acc = 0
//! for fragment in sorted(fragments by (type name, content hash)), deduplicated:
//!     acc = acc * 397 XOR ((type_identity_hash * 397) XOR content_hash)
//! ```
//!
//! Sorting removes input-order sensitivity and deduplication gives set
//! semantics. The result is a fast, non-cryptographic key: two different
//! fragment sets may collide, and the cache will then share one container
//! between them.

use std::sync::Arc;

use spc_domain::constants::FINGERPRINT_MULTIPLIER;
use spc_domain::ports::ConfigFragment;
use spc_domain::value_objects::Fingerprint;

/// Compute the fingerprint of a fragment set
pub fn fingerprint(fragments: &[Arc<dyn ConfigFragment>]) -> Fingerprint {
    let mut keyed: Vec<(&'static str, u64, u64)> = fragments
        .iter()
        .map(|fragment| {
            (
                fragment.type_name(),
                fragment.content_hash(),
                fragment.service_provider_hash_code(),
            )
        })
        .collect();
    keyed.sort_unstable();
    keyed.dedup_by(|a, b| a.0 == b.0 && a.1 == b.1);

    let value = keyed.iter().fold(0u64, |acc, &(_, _, code)| {
        acc.wrapping_mul(FINGERPRINT_MULTIPLIER) ^ code
    });
    Fingerprint::new(value)
}
