//! # Descriptor Provider
//!
//! Boundary to the component that discovers handlers and builds the routing
//! table. The resolver only reads snapshots; it never subscribes to changes.
//!
//! ## Usage
//!
//! ```rust
//! use route_expressions::models::{DispatchTarget, MethodIdentity, RouteHandler};
//! use route_expressions::registry::{DescriptorProvider, InMemoryDescriptorProvider};
//!
//! struct HomeHandler;
//! impl RouteHandler for HomeHandler {}
//!
//! let provider = InMemoryDescriptorProvider::new();
//! provider.register(
//!     DispatchTarget::for_method::<HomeHandler>(MethodIdentity::of::<HomeHandler>("Index", [])).build(),
//! );
//!
//! assert_eq!(provider.descriptors().len(), 1);
//! assert_eq!(provider.version(), 1);
//! ```

use crate::models::{DispatchTarget, RouteValues};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Immutable view of the registered descriptors
pub type DescriptorSnapshot = Arc<[Descriptor]>;

/// A registered route descriptor
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// Action backed by a handler method
    HandlerAction(Arc<DispatchTarget>),
    /// Route not backed by a handler method; never matched by method identity
    Endpoint(EndpointDescriptor),
}

impl Descriptor {
    #[must_use]
    pub fn as_handler_action(&self) -> Option<&Arc<DispatchTarget>> {
        match self {
            Self::HandlerAction(target) => Some(target),
            Self::Endpoint(_) => None,
        }
    }
}

/// Route registered without a backing handler method
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    pub display_name: String,
    pub route_values: RouteValues,
}

/// Source of the registered route descriptors.
///
/// Implementations must be cheap to snapshot; the dispatch cache scans a
/// snapshot only on the first resolution of each method.
pub trait DescriptorProvider: Send + Sync + fmt::Debug {
    fn descriptors(&self) -> DescriptorSnapshot;
}

impl<P: DescriptorProvider + ?Sized> DescriptorProvider for Arc<P> {
    fn descriptors(&self) -> DescriptorSnapshot {
        (**self).descriptors()
    }
}

/// Copy-on-write in-memory routing table
#[derive(Default)]
pub struct InMemoryDescriptorProvider {
    state: RwLock<ProviderState>,
}

struct ProviderState {
    descriptors: DescriptorSnapshot,
    version: u64,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            descriptors: Arc::from(Vec::new()),
            version: 0,
        }
    }
}

impl fmt::Debug for InMemoryDescriptorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("InMemoryDescriptorProvider")
            .field("descriptors", &state.descriptors.len())
            .field("version", &state.version)
            .finish()
    }
}

impl InMemoryDescriptorProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider pre-populated with handler actions
    pub fn with_targets(targets: impl IntoIterator<Item = DispatchTarget>) -> Self {
        let provider = Self::new();
        for target in targets {
            provider.register(target);
        }
        provider
    }

    /// Register a handler action, returning the shared target
    pub fn register(&self, target: DispatchTarget) -> Arc<DispatchTarget> {
        let target = Arc::new(target);
        debug!(
            handler = target.handler_name(),
            action = target.action_name(),
            method = %target.method(),
            "Registering handler action"
        );
        self.push(Descriptor::HandlerAction(Arc::clone(&target)));
        target
    }

    pub fn register_endpoint(&self, endpoint: EndpointDescriptor) {
        debug!(endpoint = %endpoint.display_name, "Registering endpoint");
        self.push(Descriptor::Endpoint(endpoint));
    }

    fn push(&self, descriptor: Descriptor) {
        let mut state = self.state.write();
        let mut descriptors = state.descriptors.to_vec();
        descriptors.push(descriptor);
        state.descriptors = Arc::from(descriptors);
        state.version += 1;
    }

    /// Incremented on every registration
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().descriptors.is_empty()
    }
}

impl DescriptorProvider for InMemoryDescriptorProvider {
    fn descriptors(&self) -> DescriptorSnapshot {
        Arc::clone(&self.state.read().descriptors)
    }
}
