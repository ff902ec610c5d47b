//! # Method Identity
//!
//! Stable, hashable identity for a declared handler method.
//!
//! A `MethodIdentity` is the pair (declaring handler type, method signature).
//! Equality and hashing cover the declaring type, the method name and the
//! ordered parameter *types*, so overloads are distinct while parameter names
//! ride along for argument pairing without affecting identity.

use crate::constants::HANDLER_NAME_SUFFIXES;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a handler type
#[derive(Clone, Copy)]
pub struct HandlerType {
    id: TypeId,
    name: &'static str,
}

impl HandlerType {
    /// Identity of the type `H`
    #[must_use]
    pub fn of<H: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<H>(),
            name: std::any::type_name::<H>(),
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, e.g. `app::handlers::NormalHandler`
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Last path segment with generic arguments removed
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Short name with a conventional `Handler`/`Controller` suffix stripped.
    ///
    /// A type named exactly `Handler` keeps its name.
    #[must_use]
    pub fn conventional_name(&self) -> &'static str {
        let short = self.short_name();
        HANDLER_NAME_SUFFIXES
            .iter()
            .find_map(|suffix| short.strip_suffix(suffix).filter(|rest| !rest.is_empty()))
            .unwrap_or(short)
    }
}

impl PartialEq for HandlerType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HandlerType {}

impl Hash for HandlerType {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.id.hash(state);
    }
}

impl fmt::Debug for HandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerType({})", self.name)
    }
}

impl fmt::Display for HandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type whose methods can be registered as routable actions.
///
/// The handler name defaults to the conventional name of the type; override
/// `handler_name` when the registration uses a different logical name.
pub trait RouteHandler: 'static {
    fn handler_name() -> String {
        HandlerType::of::<Self>().conventional_name().to_string()
    }
}

/// A declared method parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterInfo {
    pub name: String,
    pub type_name: String,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Parameter whose type name is taken from `T`
    pub fn of<T: ?Sized>(name: impl Into<String>) -> Self {
        Self::new(name, std::any::type_name::<T>())
    }
}

#[derive(Debug)]
struct MethodKey {
    declaring_type: HandlerType,
    name: String,
    parameters: Vec<ParameterInfo>,
}

/// Cache key identifying a declared handler method
#[derive(Clone)]
pub struct MethodIdentity {
    key: Arc<MethodKey>,
}

impl MethodIdentity {
    pub fn new(
        declaring_type: HandlerType,
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = ParameterInfo>,
    ) -> Self {
        Self {
            key: Arc::new(MethodKey {
                declaring_type,
                name: name.into(),
                parameters: parameters.into_iter().collect(),
            }),
        }
    }

    /// Identity of a method declared on `H`
    pub fn of<H: ?Sized + 'static>(
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = ParameterInfo>,
    ) -> Self {
        Self::new(HandlerType::of::<H>(), name, parameters)
    }

    #[must_use]
    pub fn declaring_type(&self) -> HandlerType {
        self.key.declaring_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.key.name
    }

    #[must_use]
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.key.parameters
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.key.parameters.iter().map(|p| p.name.as_str())
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.key.parameters.len()
    }
}

impl PartialEq for MethodIdentity {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.key, &other.key) {
            return true;
        }
        self.key.declaring_type == other.key.declaring_type
            && self.key.name == other.key.name
            && self.key.parameters.len() == other.key.parameters.len()
            && self
                .key
                .parameters
                .iter()
                .zip(&other.key.parameters)
                .all(|(a, b)| a.type_name == b.type_name)
    }
}

impl Eq for MethodIdentity {}

impl Hash for MethodIdentity {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.key.declaring_type.hash(state);
        self.key.name.hash(state);
        self.key.parameters.len().hash(state);
        for parameter in &self.key.parameters {
            parameter.type_name.hash(state);
        }
    }
}

impl fmt::Display for MethodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}(",
            self.key.declaring_type.short_name(),
            self.key.name
        )?;
        for (i, parameter) in self.key.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", parameter.name, parameter.type_name)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for MethodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodIdentity({self})")
    }
}
