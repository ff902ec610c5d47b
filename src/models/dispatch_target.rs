//! # Dispatch Target
//!
//! Immutable descriptor of one registered handler method: the logical handler
//! and action names, per-parameter binding overrides, default route values and
//! fixed route constraints.
//!
//! ## Usage
//!
//! ```rust
//! use route_expressions::models::{DispatchTarget, MethodIdentity, ParameterInfo, RouteHandler};
//! use serde_json::json;
//!
//! struct ProductsHandler;
//! impl RouteHandler for ProductsHandler {}
//!
//! let method = MethodIdentity::of::<ProductsHandler>(
//!     "Details",
//!     [ParameterInfo::of::<i64>("id")],
//! );
//! let target = DispatchTarget::for_method::<ProductsHandler>(method)
//!     .action_name("Show")
//!     .bind_parameter("id", "productId")
//!     .default_value("format", json!("html"))
//!     .constraint("area", "catalog")
//!     .build();
//!
//! assert_eq!(target.handler_name(), "Products");
//! assert_eq!(target.action_name(), "Show");
//! assert_eq!(target.binding_name_for("id"), Some("productId"));
//! ```

use super::method::{MethodIdentity, RouteHandler};
use super::route_values::RouteValues;
use serde::Serialize;
use serde_json::Value;

/// Declared parameter with an optional binding-name override
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterBinding {
    pub name: String,
    pub binding_name: Option<String>,
}

impl ParameterBinding {
    /// Key the parameter is exposed under in route values
    #[must_use]
    pub fn effective_name(&self) -> &str {
        self.binding_name.as_deref().unwrap_or(&self.name)
    }
}

/// Fixed registration-time route constraint.
///
/// An empty `route_value` means the constraint imposes no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteConstraint {
    pub route_key: String,
    pub route_value: String,
}

impl RouteConstraint {
    pub fn new(route_key: impl Into<String>, route_value: impl Into<String>) -> Self {
        Self {
            route_key: route_key.into(),
            route_value: route_value.into(),
        }
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        !self.route_value.is_empty()
    }
}

/// A registered handler action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchTarget {
    #[serde(serialize_with = "serialize_method")]
    method: MethodIdentity,
    handler_name: String,
    action_name: String,
    parameter_bindings: Vec<ParameterBinding>,
    default_route_values: RouteValues,
    route_constraints: Vec<RouteConstraint>,
}

fn serialize_method<S: serde::Serializer>(
    method: &MethodIdentity,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(method)
}

impl DispatchTarget {
    /// Builder with the handler name derived from the declaring type
    pub fn builder(method: MethodIdentity) -> DispatchTargetBuilder {
        let handler_name = method.declaring_type().conventional_name().to_string();
        DispatchTargetBuilder::new(method, handler_name)
    }

    /// Builder with the handler name taken from `H`
    pub fn for_method<H: RouteHandler>(method: MethodIdentity) -> DispatchTargetBuilder {
        DispatchTargetBuilder::new(method, H::handler_name())
    }

    #[must_use]
    pub fn method(&self) -> &MethodIdentity {
        &self.method
    }

    #[must_use]
    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    #[must_use]
    pub fn parameter_bindings(&self) -> &[ParameterBinding] {
        &self.parameter_bindings
    }

    #[must_use]
    pub fn default_route_values(&self) -> &RouteValues {
        &self.default_route_values
    }

    #[must_use]
    pub fn route_constraints(&self) -> &[RouteConstraint] {
        &self.route_constraints
    }

    /// Binding-name override for a declared parameter, if one is registered
    #[must_use]
    pub fn binding_name_for(&self, parameter: &str) -> Option<&str> {
        self.parameter_bindings
            .iter()
            .find(|binding| binding.name == parameter)
            .and_then(|binding| binding.binding_name.as_deref())
    }
}

/// Builder for [`DispatchTarget`]
#[derive(Debug, Clone)]
pub struct DispatchTargetBuilder {
    method: MethodIdentity,
    handler_name: String,
    action_name: Option<String>,
    parameter_bindings: Vec<ParameterBinding>,
    default_route_values: RouteValues,
    route_constraints: Vec<RouteConstraint>,
}

impl DispatchTargetBuilder {
    fn new(method: MethodIdentity, handler_name: String) -> Self {
        let parameter_bindings = method
            .parameter_names()
            .map(|name| ParameterBinding {
                name: name.to_string(),
                binding_name: None,
            })
            .collect();

        Self {
            method,
            handler_name,
            action_name: None,
            parameter_bindings,
            default_route_values: RouteValues::new(),
            route_constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn handler_name(mut self, name: impl Into<String>) -> Self {
        self.handler_name = name.into();
        self
    }

    /// Logical action name when it differs from the method name
    #[must_use]
    pub fn action_name(mut self, name: impl Into<String>) -> Self {
        self.action_name = Some(name.into());
        self
    }

    /// Expose a declared parameter under a different route key.
    ///
    /// Binding a name the method does not declare registers it anyway; the
    /// merger only consults bindings for parameters that receive arguments.
    #[must_use]
    pub fn bind_parameter(mut self, parameter: &str, binding_name: impl Into<String>) -> Self {
        let binding_name = Some(binding_name.into());
        match self
            .parameter_bindings
            .iter_mut()
            .find(|binding| binding.name == parameter)
        {
            Some(binding) => binding.binding_name = binding_name,
            None => self.parameter_bindings.push(ParameterBinding {
                name: parameter.to_string(),
                binding_name,
            }),
        }
        self
    }

    #[must_use]
    pub fn default_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.default_route_values.insert(key, value);
        self
    }

    #[must_use]
    pub fn constraint(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.route_constraints.push(RouteConstraint::new(key, value));
        self
    }

    pub fn build(self) -> DispatchTarget {
        let action_name = self
            .action_name
            .unwrap_or_else(|| self.method.name().to_string());

        DispatchTarget {
            method: self.method,
            handler_name: self.handler_name,
            action_name,
            parameter_bindings: self.parameter_bindings,
            default_route_values: self.default_route_values,
            route_constraints: self.route_constraints,
        }
    }
}
