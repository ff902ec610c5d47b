//! # Resolver Configuration
//!
//! Reserved route keys, the default fill-in policy and the evaluator depth
//! limit. Loaded through the `config` crate: an optional file (TOML, YAML or
//! JSON by extension) layered under `ROUTE_RESOLVER_*` environment overrides.
//!
//! ```text
//! defaults ◄── file (optional) ◄── ROUTE_RESOLVER_<FIELD> ──► validate()
//! ```

use crate::constants::{route_keys, DEFAULT_MAX_EXPRESSION_DEPTH, ENV_PREFIX};
use crate::routing::DefaultValuePolicy;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Source could not be read or deserialized
    #[error("Failed to load resolver configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Invalid configuration value
    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ConfigurationError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

/// Settings for [`ExpressionRouteResolver`](crate::routing::ExpressionRouteResolver)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub default_value_policy: DefaultValuePolicy,
    /// Constraint key that overrides the handler name
    pub handler_route_key: String,
    /// Constraint key that overrides the action name
    pub action_route_key: String,
    /// Default key filled in under [`DefaultValuePolicy::AreaOnly`]
    pub area_route_key: String,
    pub max_expression_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_value_policy: DefaultValuePolicy::default(),
            handler_route_key: route_keys::HANDLER.to_string(),
            action_route_key: route_keys::ACTION.to_string(),
            area_route_key: route_keys::AREA.to_string(),
            max_expression_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Load from environment overrides only
    pub fn load() -> ConfigResult<Self> {
        Self::from_builder(Config::builder())
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading resolver configuration");
        Self::from_builder(Config::builder().add_source(File::from(path).required(false)))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> ConfigResult<Self> {
        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        debug!(
            policy = ?config.default_value_policy,
            handler_key = %config.handler_route_key,
            action_key = %config.action_route_key,
            area_key = %config.area_route_key,
            max_depth = config.max_expression_depth,
            "Resolver configuration loaded"
        );
        Ok(config)
    }

    /// Validate route keys and limits
    pub fn validate(&self) -> ConfigResult<()> {
        let keys = [
            ("handler_route_key", &self.handler_route_key),
            ("action_route_key", &self.action_route_key),
            ("area_route_key", &self.area_route_key),
        ];

        for (field, key) in keys {
            if key.trim().is_empty() {
                return Err(ConfigurationError::invalid_value(
                    field,
                    key.as_str(),
                    "route key must not be empty",
                ));
            }
        }

        for (i, (field, key)) in keys.iter().enumerate() {
            if let Some((other, _)) = keys[i + 1..]
                .iter()
                .find(|(_, candidate)| candidate.to_lowercase() == key.to_lowercase())
            {
                return Err(ConfigurationError::invalid_value(
                    *field,
                    key.as_str(),
                    format!("route key collides with {other}"),
                ));
            }
        }

        if self.max_expression_depth == 0 {
            return Err(ConfigurationError::invalid_value(
                "max_expression_depth",
                "0",
                "depth limit must be greater than 0",
            ));
        }

        Ok(())
    }
}
