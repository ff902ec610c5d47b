//! # Route Value Merger
//!
//! Combines a dispatch target with the argument values of one invocation.
//!
//! ```text
//! arguments ──► declared name at the same position
//!           ──► binding override or that name ──────────► route values
//!                                                          │
//! constraints (declaration order) ─── handler key ──► handler_name
//!                                 ─── action key  ──► action_name
//!                                 ─── other key   ──► route values (overwrite)
//!                                                          │
//! defaults (per DefaultValuePolicy) ── absent keys only ──► route values
//! ```
//!
//! Key comparisons are case-insensitive throughout. Merging cannot fail.

use crate::config::ResolverConfig;
use crate::constants::route_keys;
use crate::expression::ArgumentValue;
use crate::models::{DispatchTarget, ResolvedRoute, RouteValues};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which registered default route values are filled in when absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValuePolicy {
    /// Every default whose key is not already present
    #[default]
    All,
    /// Only the area key
    AreaOnly,
    /// No defaults
    None,
}

/// Merges argument values, constraints and defaults into a [`ResolvedRoute`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteValueMerger {
    policy: DefaultValuePolicy,
    handler_key: String,
    action_key: String,
    area_key: String,
}

impl Default for RouteValueMerger {
    fn default() -> Self {
        Self {
            policy: DefaultValuePolicy::default(),
            handler_key: route_keys::HANDLER.to_string(),
            action_key: route_keys::ACTION.to_string(),
            area_key: route_keys::AREA.to_string(),
        }
    }
}

impl RouteValueMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            policy: config.default_value_policy,
            handler_key: config.handler_route_key.clone(),
            action_key: config.action_route_key.clone(),
            area_key: config.area_route_key.clone(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DefaultValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> DefaultValuePolicy {
        self.policy
    }

    pub fn merge(&self, target: &DispatchTarget, arguments: &[ArgumentValue]) -> ResolvedRoute {
        let mut handler_name = target.handler_name().to_string();
        let mut action_name = target.action_name().to_string();
        let mut route_values = RouteValues::with_capacity(
            arguments.len() + target.default_route_values().len(),
        );

        let declared = target.method().parameters();
        for argument in arguments {
            // Names come from the registered declaration; the caller's identity
            // only has to match it by parameter types.
            let parameter = declared
                .get(argument.position)
                .map_or(argument.parameter.as_str(), |info| info.name.as_str());
            let key = target.binding_name_for(parameter).unwrap_or(parameter);
            route_values.insert(key, argument.value.clone());
        }

        for constraint in target.route_constraints().iter().filter(|c| c.has_value()) {
            if same_key(&constraint.route_key, &self.handler_key) {
                handler_name = constraint.route_value.clone();
            } else if same_key(&constraint.route_key, &self.action_key) {
                action_name = constraint.route_value.clone();
            } else {
                route_values.insert(
                    constraint.route_key.as_str(),
                    Value::String(constraint.route_value.clone()),
                );
            }
        }

        self.fill_defaults(target.default_route_values(), &mut route_values);

        ResolvedRoute {
            handler_name,
            action_name,
            route_values,
        }
    }

    fn fill_defaults(&self, defaults: &RouteValues, route_values: &mut RouteValues) {
        for (key, value) in defaults.iter() {
            let eligible = match self.policy {
                DefaultValuePolicy::All => !self.is_name_key(key),
                DefaultValuePolicy::AreaOnly => same_key(key, &self.area_key),
                DefaultValuePolicy::None => false,
            };
            if eligible {
                route_values.insert_if_absent(key, value.clone());
            }
        }
    }

    fn is_name_key(&self, key: &str) -> bool {
        same_key(key, &self.handler_key) || same_key(key, &self.action_key)
    }
}

fn same_key(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MethodIdentity, ParameterInfo, RouteHandler};
    use serde_json::json;

    struct NormalHandler;
    impl RouteHandler for NormalHandler {}

    fn details() -> MethodIdentity {
        MethodIdentity::of::<NormalHandler>(
            "Details",
            [
                ParameterInfo::of::<i32>("id"),
                ParameterInfo::of::<String>("text"),
            ],
        )
    }

    fn argument(position: usize, parameter: &str, value: Value) -> ArgumentValue {
        ArgumentValue {
            position,
            parameter: parameter.to_string(),
            value,
        }
    }

    #[test]
    fn test_arguments_keyed_by_parameter_name() {
        let target = DispatchTarget::builder(details()).build();
        let route = RouteValueMerger::new().merge(
            &target,
            &[argument(0, "id", json!(1)), argument(1, "text", json!("a"))],
        );

        assert_eq!(route.handler_name, "Normal");
        assert_eq!(route.action_name, "Details");
        assert_eq!(route.route_values.len(), 2);
        assert_eq!(route.route_values.get("id"), Some(&json!(1)));
    }

    #[test]
    fn test_binding_override_replaces_parameter_name() {
        let target = DispatchTarget::builder(details())
            .bind_parameter("id", "productId")
            .build();
        let route = RouteValueMerger::new().merge(&target, &[argument(0, "id", json!(7))]);

        assert_eq!(route.route_values.get("productId"), Some(&json!(7)));
        assert!(!route.route_values.contains_key("id"));
    }

    #[test]
    fn test_declared_names_win_over_call_site_names() {
        let target = DispatchTarget::builder(details())
            .bind_parameter("id", "productId")
            .build();
        let route = RouteValueMerger::new().merge(
            &target,
            &[
                argument(0, "identifier", json!(7)),
                argument(1, "caption", json!("a")),
            ],
        );

        assert_eq!(route.route_values.get("productId"), Some(&json!(7)));
        assert_eq!(route.route_values.get("text"), Some(&json!("a")));
        assert!(!route.route_values.contains_key("identifier"));
        assert!(!route.route_values.contains_key("caption"));
    }

    #[test]
    fn test_constraints_override_names_and_arguments() {
        let target = DispatchTarget::builder(details())
            .constraint("Controller", "Admin")
            .constraint("ACTION", "Edit")
            .constraint("id", "42")
            .constraint("text", "")
            .build();
        let route = RouteValueMerger::new().merge(
            &target,
            &[argument(0, "id", json!(1)), argument(1, "text", json!("kept"))],
        );

        assert_eq!(route.handler_name, "Admin");
        assert_eq!(route.action_name, "Edit");
        assert_eq!(route.route_values.get("id"), Some(&json!("42")));
        assert_eq!(route.route_values.get("text"), Some(&json!("kept")));
        assert!(!route.route_values.contains_key("controller"));
    }

    #[test]
    fn test_later_constraint_wins() {
        let target = DispatchTarget::builder(details())
            .constraint("action", "First")
            .constraint("action", "Second")
            .build();
        let route = RouteValueMerger::new().merge(&target, &[]);

        assert_eq!(route.action_name, "Second");
    }

    #[test]
    fn test_all_policy_fills_absent_defaults() {
        let target = DispatchTarget::builder(details())
            .default_value("id", json!(0))
            .default_value("format", json!("html"))
            .default_value("controller", json!("Ignored"))
            .build();
        let route = RouteValueMerger::new().merge(&target, &[argument(0, "id", json!(5))]);

        assert_eq!(route.route_values.get("id"), Some(&json!(5)));
        assert_eq!(route.route_values.get("format"), Some(&json!("html")));
        assert!(!route.route_values.contains_key("controller"));
        assert_eq!(route.handler_name, "Normal");
    }

    #[test]
    fn test_area_only_policy() {
        let target = DispatchTarget::builder(details())
            .default_value("Area", json!("admin"))
            .default_value("format", json!("html"))
            .build();
        let route = RouteValueMerger::new()
            .with_policy(DefaultValuePolicy::AreaOnly)
            .merge(&target, &[]);

        assert_eq!(route.route_values.get("area"), Some(&json!("admin")));
        assert!(!route.route_values.contains_key("format"));
    }

    #[test]
    fn test_none_policy_skips_defaults() {
        let target = DispatchTarget::builder(details())
            .default_value("area", json!("admin"))
            .build();
        let route = RouteValueMerger::new()
            .with_policy(DefaultValuePolicy::None)
            .merge(&target, &[]);

        assert!(route.route_values.is_empty());
    }

    #[test]
    fn test_custom_reserved_keys_from_config() {
        let config = ResolverConfig {
            handler_route_key: "handler".to_string(),
            ..ResolverConfig::default()
        };
        let target = DispatchTarget::builder(details())
            .constraint("handler", "Reports")
            .constraint("controller", "Stored")
            .build();
        let route = RouteValueMerger::from_config(&config).merge(&target, &[]);

        assert_eq!(route.handler_name, "Reports");
        assert_eq!(route.route_values.get("controller"), Some(&json!("Stored")));
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(
            serde_json::to_value(DefaultValuePolicy::AreaOnly).unwrap(),
            json!("area_only")
        );
        let policy: DefaultValuePolicy = serde_json::from_value(json!("none")).unwrap();
        assert_eq!(policy, DefaultValuePolicy::None);
    }
}
