//! # Routing Constants
//!
//! Reserved route keys and default limits shared by the merger, the
//! configuration loader and the descriptor builders.

/// Route keys that carry handler and action names instead of route values
pub mod route_keys {
    pub const HANDLER: &str = "controller";
    pub const ACTION: &str = "action";
    pub const AREA: &str = "area";
}

/// Type-name suffixes stripped when deriving a conventional handler name
pub const HANDLER_NAME_SUFFIXES: &[&str] = &["Handler", "Controller"];

/// Maximum nesting of an argument expression before evaluation is refused
pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 64;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "ROUTE_RESOLVER";

/// Environment variables consulted for the runtime environment, in order
pub const ENVIRONMENT_VARIABLES: &[&str] = &["ROUTE_RESOLVER_ENV", "APP_ENV"];

/// Environment variable selecting the log output format
pub const LOG_FORMAT_VARIABLE: &str = "ROUTE_RESOLVER_LOG_FORMAT";
