//! Shared handler fixtures and descriptor providers for integration tests.
#![allow(dead_code)]

use route_expressions::{
    DescriptorProvider, DispatchTarget, InMemoryDescriptorProvider, MethodIdentity, ParameterInfo,
    RouteHandler,
};
use route_expressions::registry::DescriptorSnapshot;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Handler whose conventional name is `Normal`
pub struct NormalHandler;
impl RouteHandler for NormalHandler {}

/// Model passed as a complex argument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestModel {
    pub name: String,
    pub quantity: u32,
}

impl TestModel {
    pub fn sample() -> Self {
        Self {
            name: "widget".to_string(),
            quantity: 3,
        }
    }
}

pub fn action_without_parameters() -> MethodIdentity {
    MethodIdentity::of::<NormalHandler>("ActionWithoutParameters", [])
}

pub fn action_with_overloads() -> MethodIdentity {
    MethodIdentity::of::<NormalHandler>("ActionWithOverloads", [])
}

pub fn action_with_overloads_id() -> MethodIdentity {
    MethodIdentity::of::<NormalHandler>(
        "ActionWithOverloads",
        [ParameterInfo::of::<i32>("id")],
    )
}

pub fn action_with_multiple_parameters() -> MethodIdentity {
    MethodIdentity::of::<NormalHandler>(
        "ActionWithMultipleParameters",
        [
            ParameterInfo::of::<i32>("id"),
            ParameterInfo::of::<String>("text"),
            ParameterInfo::of::<TestModel>("model"),
        ],
    )
}

pub fn action_with_changed_name() -> MethodIdentity {
    MethodIdentity::of::<NormalHandler>("ActionWithChangedName", [])
}

pub fn unregistered_action() -> MethodIdentity {
    MethodIdentity::of::<NormalHandler>("UnregisteredAction", [])
}

/// Dispatch targets registered for every `NormalHandler` action
pub fn normal_targets() -> Vec<DispatchTarget> {
    vec![
        DispatchTarget::for_method::<NormalHandler>(action_without_parameters()).build(),
        DispatchTarget::for_method::<NormalHandler>(action_with_overloads()).build(),
        DispatchTarget::for_method::<NormalHandler>(action_with_overloads_id()).build(),
        DispatchTarget::for_method::<NormalHandler>(action_with_multiple_parameters()).build(),
        DispatchTarget::for_method::<NormalHandler>(action_with_changed_name())
            .action_name("AnotherName")
            .build(),
    ]
}

pub fn normal_provider() -> Arc<InMemoryDescriptorProvider> {
    Arc::new(InMemoryDescriptorProvider::with_targets(normal_targets()))
}

/// Provider that counts snapshot requests and optionally stalls each one
#[derive(Debug)]
pub struct CountingProvider {
    inner: InMemoryDescriptorProvider,
    delay: Duration,
    snapshots: AtomicUsize,
}

impl CountingProvider {
    pub fn new(targets: Vec<DispatchTarget>) -> Self {
        Self::with_delay(targets, Duration::ZERO)
    }

    pub fn with_delay(targets: Vec<DispatchTarget>, delay: Duration) -> Self {
        Self {
            inner: InMemoryDescriptorProvider::with_targets(targets),
            delay,
            snapshots: AtomicUsize::new(0),
        }
    }

    pub fn snapshots(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }

    pub fn register(&self, target: DispatchTarget) -> Arc<DispatchTarget> {
        self.inner.register(target)
    }
}

impl DescriptorProvider for CountingProvider {
    fn descriptors(&self) -> DescriptorSnapshot {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.inner.descriptors()
    }
}
