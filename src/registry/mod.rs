//! # Registry Infrastructure
//!
//! The routing table boundary and the cache that maps method identities onto it.
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── DescriptorProvider     (Snapshot of registered route descriptors)
//! │   └── InMemoryDescriptorProvider
//! └── DispatchTargetCache    (MethodIdentity → DispatchTarget memo table)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use route_expressions::models::{DispatchTarget, MethodIdentity, RouteHandler};
//! use route_expressions::registry::{DispatchTargetCache, InMemoryDescriptorProvider};
//!
//! struct HomeHandler;
//! impl RouteHandler for HomeHandler {}
//!
//! let method = MethodIdentity::of::<HomeHandler>("Index", []);
//! let provider = InMemoryDescriptorProvider::with_targets([
//!     DispatchTarget::for_method::<HomeHandler>(method.clone()).build(),
//! ]);
//!
//! let cache = DispatchTargetCache::new();
//! let target = cache.resolve(&method, &provider)?;
//! assert_eq!(target.handler_name(), "Home");
//! assert_eq!(cache.stats().scans, 1);
//! # Ok::<(), route_expressions::ResolveError>(())
//! ```

pub mod descriptor_provider;
pub mod dispatch_cache;

pub use descriptor_provider::{
    Descriptor, DescriptorProvider, DescriptorSnapshot, EndpointDescriptor,
    InMemoryDescriptorProvider,
};
pub use dispatch_cache::{DispatchCacheStats, DispatchTargetCache};
