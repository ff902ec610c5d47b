#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Route Expressions
//!
//! Resolves a typed "invoke this action on this handler" expression into the
//! route it targets: the logical handler name, the action name and the route
//! values carried by the call's arguments.
//!
//! ## Overview
//!
//! Callers describe the target of a link or redirect as an [`Invocation`]
//! over a handler type instead of spelling out handler and action names as
//! strings. The resolver analyzes the invocation, finds the registered
//! [`DispatchTarget`] for the invoked method and merges argument values with
//! the target's binding overrides, constraints and defaults.
//!
//! ## Architecture
//!
//! ```text
//! Invocation<H> ──► ExpressionAnalyzer ──► DispatchTargetCache ──► RouteValueMerger ──► ResolvedRoute
//!                     (+ Evaluator)           │
//!                                             ▼
//!                                     DescriptorProvider
//! ```
//!
//! ## Module Organization
//!
//! - [`expression`] - Invocation AST, argument evaluator and analyzer
//! - [`models`] - Method identities, dispatch targets and route values
//! - [`registry`] - Descriptor provider boundary and dispatch target cache
//! - [`routing`] - Route value merger and the resolver facade
//! - [`config`] - Resolver configuration loading
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use route_expressions::{
//!     DispatchTarget, Expr, ExpressionRouteResolver, InMemoryDescriptorProvider, Invocation,
//!     MethodIdentity, ParameterInfo, RouteHandler,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct OrdersHandler;
//! impl RouteHandler for OrdersHandler {}
//!
//! let show = MethodIdentity::of::<OrdersHandler>("Show", [ParameterInfo::of::<u64>("id")]);
//! let provider = Arc::new(InMemoryDescriptorProvider::new());
//! provider.register(
//!     DispatchTarget::for_method::<OrdersHandler>(show.clone())
//!         .bind_parameter("id", "orderId")
//!         .constraint("area", "sales")
//!         .build(),
//! );
//!
//! let resolver = ExpressionRouteResolver::new(provider);
//! let route = resolver.resolve(&Invocation::<OrdersHandler>::call(show, [Expr::constant(12)]))?;
//!
//! assert_eq!(route.to_string(), r#"Orders/Show {area="sales", orderId=12}"#);
//! # Ok::<(), route_expressions::ResolveError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod expression;
pub mod logging;
pub mod models;
pub mod registry;
pub mod routing;

pub use config::{ConfigResult, ConfigurationError, ResolverConfig};
pub use error::{EvaluationError, ResolveError, Result};
pub use expression::{
    AnalyzedInvocation, ArgumentValue, BinaryOp, Evaluator, Expr, ExpressionAnalyzer, Invocation,
    UnaryOp,
};
pub use models::{
    DispatchTarget, DispatchTargetBuilder, HandlerType, MethodIdentity, ParameterBinding,
    ParameterInfo, ResolvedRoute, RouteConstraint, RouteHandler, RouteValues,
};
pub use registry::{
    Descriptor, DescriptorProvider, DispatchCacheStats, DispatchTargetCache, EndpointDescriptor,
    InMemoryDescriptorProvider,
};
pub use routing::{DefaultValuePolicy, ExpressionRouteResolver, RouteValueMerger};
