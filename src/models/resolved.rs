//! # Resolved Route
//!
//! Output of a single resolution. Built fresh per call and never cached,
//! since argument values differ from call to call.

use super::route_values::RouteValues;
use crate::constants::route_keys;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Handler name, action name and merged route values for one invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRoute {
    pub handler_name: String,
    pub action_name: String,
    pub route_values: RouteValues,
}

impl ResolvedRoute {
    /// Route values plus the handler and action under the default reserved keys
    #[must_use]
    pub fn to_route_dictionary(&self) -> RouteValues {
        self.to_route_dictionary_with(route_keys::HANDLER, route_keys::ACTION)
    }

    /// Route values plus the handler and action under the given keys.
    ///
    /// The names always win over a route value stored under the same key.
    #[must_use]
    pub fn to_route_dictionary_with(&self, handler_key: &str, action_key: &str) -> RouteValues {
        let mut dictionary = self.route_values.clone();
        dictionary.insert(handler_key, Value::String(self.handler_name.clone()));
        dictionary.insert(action_key, Value::String(self.action_name.clone()));
        dictionary
    }
}

impl fmt::Display for ResolvedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {{", self.handler_name, self.action_name)?;
        for (i, (key, value)) in self.route_values.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}
