//! Configuration validation
//!
//! Every fragment validates against the full configuration before anything
//! is fingerprinted or built. The first rejection aborts the request.

use spc_domain::Configuration;
use spc_domain::error::{Error, Result};
use tracing::warn;

/// Run every fragment's validation
///
/// Errors other than [`Error::ConfigurationInvalid`] are wrapped so the
/// caller always sees which fragment rejected the configuration.
pub fn validate(configuration: &Configuration) -> Result<()> {
    for fragment in configuration.fragments() {
        if let Err(error) = fragment.validate(configuration) {
            warn!(fragment = fragment.type_name(), %error, "Configuration rejected");
            return Err(match error {
                invalid @ Error::ConfigurationInvalid { .. } => invalid,
                other => Error::configuration_invalid(fragment.type_name(), other.to_string()),
            });
        }
    }
    Ok(())
}
