//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service provider cache
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration fragment rejected the configuration during validation
    #[error("Invalid configuration (rejected by {fragment}): {message}")]
    ConfigurationInvalid {
        /// Type name of the fragment that rejected the configuration
        fragment: String,
        /// Description of the validation failure
        message: String,
    },

    /// The container does not provide a singleton options initializer
    #[error(
        "Container {container} does not provide a singleton options initializer; \
         it was not built with the core services registered"
    )]
    MissingCoreInitializer {
        /// Identifier or description of the offending container
        container: String,
    },

    /// Registration merge or container construction failed
    #[error("Container build failed: {message}")]
    BuildFailure {
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No registration exists for the requested service type
    #[error("Service not registered: {service}")]
    ServiceNotRegistered {
        /// Name of the requested service type
        service: String,
    },

    /// A registered instance does not match the requested service type
    #[error("Service type mismatch: instance registered for {service} has a different type")]
    ServiceTypeMismatch {
        /// Name of the requested service type
        service: String,
    },

    /// Settings loading or validation error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// Cache error creation methods
impl Error {
    /// Create a validation error raised by a fragment
    pub fn configuration_invalid<F: Into<String>, S: Into<String>>(fragment: F, message: S) -> Self {
        Self::ConfigurationInvalid {
            fragment: fragment.into(),
            message: message.into(),
        }
    }

    /// Create a missing initializer error
    pub fn missing_core_initializer<S: Into<String>>(container: S) -> Self {
        Self::MissingCoreInitializer {
            container: container.into(),
        }
    }

    /// Create a build failure error
    pub fn build_failure<S: Into<String>>(message: S) -> Self {
        Self::BuildFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Create a build failure error with source
    pub fn build_failure_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::BuildFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error came from fragment validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ConfigurationInvalid { .. })
    }
}

// Container resolution error creation methods
impl Error {
    /// Create a service not registered error
    pub fn service_not_registered<S: Into<String>>(service: S) -> Self {
        Self::ServiceNotRegistered {
            service: service.into(),
        }
    }

    /// Create a service type mismatch error
    pub fn service_type_mismatch<S: Into<String>>(service: S) -> Self {
        Self::ServiceTypeMismatch {
            service: service.into(),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
