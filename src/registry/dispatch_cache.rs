//! # Dispatch Target Cache
//!
//! Lazily populated map from method identity to registered dispatch target.
//!
//! ## Concurrency
//!
//! ```text
//! resolve(method)
//!   │
//!   ├─ resolved.get(method) ── hit ──► Arc<DispatchTarget>
//!   │
//!   └─ miss ─► gate = in_flight[method] ─► lock(gate)
//!                 │
//!                 ├─ resolved.get(method) ── hit ──► (another caller finished the scan)
//!                 │
//!                 └─ scan provider snapshot ─► Ok  ─► resolved.insert ─► drop gate entry
//!                                            └► Err ─► gate entry kept (nothing memoized)
//! ```
//!
//! Hits take only a shard read lock. Callers that miss on the same method
//! serialize on that method's gate, so a successful scan runs at most once per
//! method; callers for other methods hold other gates and never wait on it.
//! Failed lookups are not memoized and a later call scans again, under the
//! same gate. Every call counts as exactly one hit or one miss.
//!
//! Entries are never evicted: the routing table is static for the lifetime
//! of the process.

use super::descriptor_provider::DescriptorProvider;
use crate::error::{ResolveError, Result};
use crate::logging::log_cache_operation;
use crate::models::{DispatchTarget, MethodIdentity};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Concurrent memo table of resolved dispatch targets
#[derive(Debug, Default)]
pub struct DispatchTargetCache {
    resolved: DashMap<MethodIdentity, Arc<DispatchTarget>>,
    in_flight: DashMap<MethodIdentity, Arc<Mutex<()>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    scans: AtomicU64,
}

/// Statistics about the dispatch cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchCacheStats {
    pub cached_targets: usize,
    pub hits: u64,
    pub misses: u64,
    pub scans: u64,
}

impl DispatchTargetCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the dispatch target for `method`, scanning the provider on
    /// first use.
    pub fn resolve(
        &self,
        method: &MethodIdentity,
        provider: &dyn DescriptorProvider,
    ) -> Result<Arc<DispatchTarget>> {
        if let Some(target) = self.cached(method) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(method = %method, "Dispatch target cache hit");
            return Ok(target);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let gate = Arc::clone(
            self.in_flight
                .entry(method.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );

        let _guard = gate.lock();
        if let Some(target) = self.cached(method) {
            return Ok(target);
        }

        let target = self.scan_and_store(method, provider)?;
        // Only after the insert: a failed scan keeps the gate so that waiters
        // and newcomers keep serializing on the same lock.
        self.in_flight
            .remove_if(method, |_, current| Arc::ptr_eq(current, &gate));
        Ok(target)
    }

    fn cached(&self, method: &MethodIdentity) -> Option<Arc<DispatchTarget>> {
        self.resolved.get(method).map(|entry| Arc::clone(entry.value()))
    }

    fn scan_and_store(
        &self,
        method: &MethodIdentity,
        provider: &dyn DescriptorProvider,
    ) -> Result<Arc<DispatchTarget>> {
        self.scans.fetch_add(1, Ordering::Relaxed);
        let snapshot = provider.descriptors();
        debug!(
            method = %method,
            descriptors = snapshot.len(),
            "Scanning descriptors for dispatch target"
        );

        let target = snapshot
            .iter()
            .filter_map(|descriptor| descriptor.as_handler_action())
            .find(|target| target.method() == method)
            .cloned()
            .ok_or_else(|| ResolveError::DispatchTargetNotFound {
                method: method.clone(),
            })?;

        self.resolved.insert(method.clone(), Arc::clone(&target));
        log_cache_operation(
            "populate",
            &method.to_string(),
            Some(target.handler_name()),
            Some(target.action_name()),
            "cached",
            None,
        );
        Ok(target)
    }

    #[must_use]
    pub fn contains(&self, method: &MethodIdentity) -> bool {
        self.resolved.contains_key(method)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> DispatchCacheStats {
        DispatchCacheStats {
            cached_targets: self.resolved.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
        }
    }
}
