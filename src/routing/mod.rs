//! # Routing
//!
//! Resolution of typed invocations into [`ResolvedRoute`](crate::models::ResolvedRoute)s.
//!
//! ```text
//! Routing
//! ├── ExpressionRouteResolver   (analyze → cache lookup → merge)
//! └── RouteValueMerger          (bindings, constraints, default fill-in)
//! ```

pub mod merger;
pub mod resolver;

pub use merger::{DefaultValuePolicy, RouteValueMerger};
pub use resolver::ExpressionRouteResolver;
