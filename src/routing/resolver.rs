//! # Expression Route Resolver
//!
//! Turns a typed invocation into the handler name, action name and route
//! values of the registered action it targets.
//!
//! ## Resolution Flow
//!
//! ```text
//! Invocation<H>
//!      │
//! ┌────▼──────────────┐   shape / static / evaluation errors
//! │ ExpressionAnalyzer├──────────────────────────────────────► Err
//! └────┬──────────────┘
//!      │ MethodIdentity + ArgumentValues
//! ┌────▼──────────────┐   DispatchTargetNotFound
//! │ DispatchTarget    ├──────────────────────────────────────► Err
//! │ Cache             │
//! └────┬──────────────┘
//!      │ Arc<DispatchTarget>
//! ┌────▼──────────────┐
//! │ RouteValueMerger  ├──────────────────────────────────────► ResolvedRoute
//! └───────────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! `ExpressionRouteResolver` is `Send + Sync`. The cache is the only shared
//! mutable state and no lock is held while analyzing or merging.
//!
//! ## Example Usage
//!
//! ```rust
//! use route_expressions::expression::{Expr, Invocation};
//! use route_expressions::models::{DispatchTarget, MethodIdentity, ParameterInfo, RouteHandler};
//! use route_expressions::registry::InMemoryDescriptorProvider;
//! use route_expressions::routing::ExpressionRouteResolver;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct ProductsController;
//! impl RouteHandler for ProductsController {}
//!
//! let details = MethodIdentity::of::<ProductsController>("Details", [ParameterInfo::of::<i32>("id")]);
//! let provider = Arc::new(InMemoryDescriptorProvider::new());
//! provider.register(DispatchTarget::for_method::<ProductsController>(details.clone()).build());
//!
//! let resolver = ExpressionRouteResolver::new(provider);
//! let route = resolver.resolve(&Invocation::<ProductsController>::call(details, [Expr::constant(3)]))?;
//!
//! assert_eq!(route.handler_name, "Products");
//! assert_eq!(route.action_name, "Details");
//! assert_eq!(route.route_values.get("id"), Some(&json!(3)));
//! # Ok::<(), route_expressions::ResolveError>(())
//! ```

use super::merger::RouteValueMerger;
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::expression::{Evaluator, ExpressionAnalyzer, Invocation};
use crate::models::{DispatchTarget, MethodIdentity, ResolvedRoute, RouteHandler};
use crate::registry::{DescriptorProvider, DispatchTargetCache};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Resolves typed invocations against a descriptor provider
#[derive(Debug, Clone)]
pub struct ExpressionRouteResolver {
    provider: Arc<dyn DescriptorProvider>,
    cache: Arc<DispatchTargetCache>,
    analyzer: ExpressionAnalyzer,
    merger: RouteValueMerger,
}

impl ExpressionRouteResolver {
    /// Resolver with the default configuration
    pub fn new(provider: Arc<dyn DescriptorProvider>) -> Self {
        Self::from_config(provider, &ResolverConfig::default())
    }

    pub fn from_config(provider: Arc<dyn DescriptorProvider>, config: &ResolverConfig) -> Self {
        Self {
            provider,
            cache: Arc::new(DispatchTargetCache::new()),
            analyzer: ExpressionAnalyzer::new(Evaluator::new(config.max_expression_depth)),
            merger: RouteValueMerger::from_config(config),
        }
    }

    /// Share a cache with other resolvers over the same provider
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<DispatchTargetCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<DispatchTargetCache> {
        &self.cache
    }

    #[must_use]
    pub fn merger(&self) -> &RouteValueMerger {
        &self.merger
    }

    /// Resolve the route an invocation targets.
    ///
    /// # Errors
    ///
    /// - `InvalidExpressionShape` when the body is not a single call with
    ///   matching arity
    /// - `StaticInvocationNotSupported` when the call has no receiver
    /// - `Evaluation` when an argument expression fails
    /// - `DispatchTargetNotFound` when the method is not a registered action
    #[instrument(
        skip(self, invocation),
        fields(handler = %Invocation::<H>::handler_type())
    )]
    pub fn resolve<H: RouteHandler + ?Sized>(
        &self,
        invocation: &Invocation<H>,
    ) -> Result<ResolvedRoute> {
        let analyzed = self.analyzer.analyze(invocation)?;
        let target = self.dispatch_target(&analyzed.method)?;
        let route = self.merger.merge(&target, &analyzed.arguments);

        debug!(
            method = %analyzed.method,
            route = %route,
            "Resolved invocation"
        );
        Ok(route)
    }

    /// Registered dispatch target for a method, scanning the provider once
    pub fn dispatch_target(&self, method: &MethodIdentity) -> Result<Arc<DispatchTarget>> {
        self.cache.resolve(method, self.provider.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvaluationError, ResolveError};
    use crate::expression::Expr;
    use crate::models::ParameterInfo;
    use crate::registry::InMemoryDescriptorProvider;
    use crate::routing::DefaultValuePolicy;
    use serde_json::json;

    struct NormalHandler;
    impl RouteHandler for NormalHandler {}

    fn overload() -> MethodIdentity {
        MethodIdentity::of::<NormalHandler>(
            "ActionWithOverloads",
            [ParameterInfo::of::<i32>("id")],
        )
    }

    fn provider() -> Arc<InMemoryDescriptorProvider> {
        Arc::new(InMemoryDescriptorProvider::with_targets([
            DispatchTarget::for_method::<NormalHandler>(overload())
                .default_value("format", json!("html"))
                .build(),
        ]))
    }

    #[test]
    fn test_resolve_overload() {
        let resolver = ExpressionRouteResolver::new(provider());
        let route = resolver
            .resolve(&Invocation::<NormalHandler>::call(overload(), [Expr::constant(1)]))
            .unwrap();

        assert_eq!(route.handler_name, "Normal");
        assert_eq!(route.action_name, "ActionWithOverloads");
        assert_eq!(route.route_values.get("id"), Some(&json!(1)));
        assert_eq!(route.route_values.get("format"), Some(&json!("html")));
    }

    #[test]
    fn test_config_policy_is_applied() {
        let config = ResolverConfig {
            default_value_policy: DefaultValuePolicy::None,
            ..ResolverConfig::default()
        };
        let resolver = ExpressionRouteResolver::from_config(provider(), &config);
        let route = resolver
            .resolve(&Invocation::<NormalHandler>::call(overload(), [Expr::constant(1)]))
            .unwrap();

        assert!(!route.route_values.contains_key("format"));
    }

    #[test]
    fn test_config_depth_is_applied() {
        let config = ResolverConfig {
            max_expression_depth: 2,
            ..ResolverConfig::default()
        };
        let resolver = ExpressionRouteResolver::from_config(provider(), &config);
        let nested = Expr::unary(
            crate::expression::UnaryOp::Neg,
            Expr::unary(
                crate::expression::UnaryOp::Neg,
                Expr::unary(crate::expression::UnaryOp::Neg, Expr::constant(1)),
            ),
        );

        assert!(matches!(
            resolver.resolve(&Invocation::<NormalHandler>::call(overload(), [nested])),
            Err(ResolveError::Evaluation(EvaluationError::DepthLimitExceeded { limit: 2 }))
        ));
    }

    #[test]
    fn test_shape_errors_skip_the_cache() {
        let resolver = ExpressionRouteResolver::new(provider());
        let result = resolver.resolve(&Invocation::<NormalHandler>::new(Expr::constant(1)));

        assert!(matches!(
            result,
            Err(ResolveError::InvalidExpressionShape { .. })
        ));
        assert_eq!(resolver.cache().stats().misses, 0);
    }

    #[test]
    fn test_shared_cache() {
        let provider = provider();
        let first = ExpressionRouteResolver::new(provider.clone());
        let second = ExpressionRouteResolver::new(provider).with_cache(Arc::clone(first.cache()));

        first.dispatch_target(&overload()).unwrap();
        second.dispatch_target(&overload()).unwrap();

        assert_eq!(first.cache().stats().scans, 1);
        assert_eq!(second.cache().stats().hits, 1);
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExpressionRouteResolver>();
    }
}
