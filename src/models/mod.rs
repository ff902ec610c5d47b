//! # Routing Models
//!
//! Data entities shared across resolution: method identities, dispatch
//! targets, the case-insensitive route value dictionary and resolved routes.

pub mod dispatch_target;
pub mod method;
pub mod resolved;
pub mod route_values;

pub use dispatch_target::{DispatchTarget, DispatchTargetBuilder, ParameterBinding, RouteConstraint};
pub use method::{HandlerType, MethodIdentity, ParameterInfo, RouteHandler};
pub use resolved::ResolvedRoute;
pub use route_values::RouteValues;
