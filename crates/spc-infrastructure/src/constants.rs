//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Keying constants are defined in `spc_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "spc.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "spc";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "SPC";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the configured log filter
pub const LOG_FILTER_ENV: &str = "SPC_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";
