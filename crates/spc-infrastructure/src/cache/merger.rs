//! Registration merger
//!
//! Collects the registrations of every fragment, falls back to the default
//! core services when no fragment supplied them, then applies the
//! configuration's replacement map.
//!
//! Replacement happens before fragments contribute a second time:
//!
//! ```text
//! contribute(empty) ──► base set ──► replace_with(map) ──► contribute(replaced) ──► final set
//! ```
//!
//! A fragment that unconditionally `add`s a service during the second pass
//! overrides the replacement for that service; fragments that use `try_add`
//! leave it in place.

use spc_domain::Configuration;
use spc_domain::ports::CoreServicesBootstrap;
use spc_domain::value_objects::RegistrationSet;
use tracing::debug;

/// Finished registration set plus whether a fragment supplied the core services
#[derive(Debug, Clone)]
pub struct MergedRegistrations {
    /// Registrations to build the container from
    pub registrations: RegistrationSet,
    /// Whether a fragment supplied the core registrations
    pub core_present: bool,
}

/// Merge the configuration's registrations
pub fn merge(
    configuration: &Configuration,
    core_services: &dyn CoreServicesBootstrap,
) -> MergedRegistrations {
    let mut registrations = RegistrationSet::new();
    let mut core_present = contribute(configuration, core_services, &mut registrations);

    if let Some(replacements) = configuration.replacements() {
        for service in replacements.services() {
            if !registrations.contains(service) {
                debug!(service = service.name(), "Replacement target not registered, ignored");
            }
        }

        let mut replaced = registrations.replace_with(replacements);
        core_present = contribute(configuration, core_services, &mut replaced);
        registrations = replaced;
    }

    debug!(
        registrations = registrations.len(),
        core_present, "Registrations merged"
    );
    MergedRegistrations {
        registrations,
        core_present,
    }
}

fn contribute(
    configuration: &Configuration,
    core_services: &dyn CoreServicesBootstrap,
    registrations: &mut RegistrationSet,
) -> bool {
    let mut core_present = false;
    for fragment in configuration.fragments() {
        if fragment.contribute_registrations(registrations) {
            core_present = true;
        }
    }

    if !core_present {
        core_services.try_add_core_services(registrations);
    }
    core_present
}
