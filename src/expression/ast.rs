//! # Invocation Expression Tree
//!
//! A typed invocation is a lambda `|handler: &H| body` whose body should be a
//! single method call on the handler. Argument sub-expressions form a small
//! pure expression language that the evaluator folds to values.
//!
//! ## Usage
//!
//! ```rust
//! use route_expressions::expression::{BinaryOp, Expr, Invocation};
//! use route_expressions::models::{MethodIdentity, ParameterInfo, RouteHandler};
//!
//! struct NormalHandler;
//! impl RouteHandler for NormalHandler {}
//!
//! let page = 2;
//! let method = MethodIdentity::of::<NormalHandler>(
//!     "List",
//!     [ParameterInfo::of::<i32>("page")],
//! );
//!
//! // handler => handler.List(page + 1)
//! let invocation = Invocation::<NormalHandler>::call(
//!     method,
//!     [Expr::binary(BinaryOp::Add, Expr::captured("page", page), Expr::constant(1))],
//! );
//! assert!(invocation.body().is_call());
//! ```

use crate::error::EvaluationError;
use crate::models::{HandlerType, MethodIdentity, RouteHandler};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Opaque argument computation, run at most once per resolution
pub type Thunk = Arc<dyn Fn() -> Result<Value, EvaluationError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// Method call node
#[derive(Debug, Clone)]
pub struct MethodCall {
    /// Receiver instance; `None` for a static call
    pub receiver: Option<Box<Expr>>,
    pub method: MethodIdentity,
    pub arguments: Vec<Expr>,
}

/// Expression node
#[derive(Clone)]
pub enum Expr {
    Constant(Value),
    /// The handler instance the invocation lambda receives
    Parameter,
    /// A closure-captured local
    Captured { name: String, value: Value },
    Member { target: Box<Expr>, member: String },
    Index { target: Box<Expr>, index: Box<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Conditional {
        condition: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
    },
    Coalesce { value: Box<Expr>, fallback: Box<Expr> },
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
    Call(MethodCall),
    Deferred { label: String, thunk: Thunk },
}

impl Expr {
    /// A literal value. A NaN or infinite `f64` converts to null; use
    /// [`Expr::float`] to reject it instead.
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    /// A floating-point literal that must be finite
    pub fn float(value: f64) -> Result<Self, EvaluationError> {
        serde_json::Number::from_f64(value)
            .map(|number| Self::Constant(Value::Number(number)))
            .ok_or_else(|| EvaluationError::NonFiniteNumber {
                operation: "constant".to_string(),
            })
    }

    #[must_use]
    pub fn null() -> Self {
        Self::Constant(Value::Null)
    }

    #[must_use]
    pub fn parameter() -> Self {
        Self::Parameter
    }

    pub fn captured(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Captured {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Capture any serializable value; serialization runs at evaluation time
    pub fn captured_serialize<T>(name: impl Into<String>, value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self::deferred(name, move || Ok(serde_json::to_value(&value)?))
    }

    pub fn deferred<F>(label: impl Into<String>, thunk: F) -> Self
    where
        F: Fn() -> Result<Value, EvaluationError> + Send + Sync + 'static,
    {
        Self::Deferred {
            label: label.into(),
            thunk: Arc::new(thunk),
        }
    }

    #[must_use]
    pub fn member(self, member: impl Into<String>) -> Self {
        Self::Member {
            target: Box::new(self),
            member: member.into(),
        }
    }

    #[must_use]
    pub fn index(self, index: Expr) -> Self {
        Self::Index {
            target: Box::new(self),
            index: Box::new(index),
        }
    }

    #[must_use]
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[must_use]
    pub fn conditional(condition: Expr, when_true: Expr, when_false: Expr) -> Self {
        Self::Conditional {
            condition: Box::new(condition),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        }
    }

    #[must_use]
    pub fn coalesce(value: Expr, fallback: Expr) -> Self {
        Self::Coalesce {
            value: Box::new(value),
            fallback: Box::new(fallback),
        }
    }

    pub fn array(elements: impl IntoIterator<Item = Expr>) -> Self {
        Self::Array(elements.into_iter().collect())
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Instance call on `receiver`
    pub fn call(
        receiver: Expr,
        method: MethodIdentity,
        arguments: impl IntoIterator<Item = Expr>,
    ) -> Self {
        Self::Call(MethodCall {
            receiver: Some(Box::new(receiver)),
            method,
            arguments: arguments.into_iter().collect(),
        })
    }

    pub fn static_call(method: MethodIdentity, arguments: impl IntoIterator<Item = Expr>) -> Self {
        Self::Call(MethodCall {
            receiver: None,
            method,
            arguments: arguments.into_iter().collect(),
        })
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    #[must_use]
    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call(_))
    }

    /// Node kind name used in error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant",
            Self::Parameter => "parameter",
            Self::Captured { .. } => "captured variable",
            Self::Member { .. } => "member access",
            Self::Index { .. } => "index",
            Self::Unary { .. } => "unary operation",
            Self::Binary { .. } => "binary operation",
            Self::Conditional { .. } => "conditional",
            Self::Coalesce { .. } => "coalesce",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Call(_) => "method call",
            Self::Deferred { .. } => "deferred computation",
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Parameter => f.write_str("Parameter"),
            Self::Captured { name, value } => f
                .debug_struct("Captured")
                .field("name", name)
                .field("value", value)
                .finish(),
            Self::Member { target, member } => f
                .debug_struct("Member")
                .field("target", target)
                .field("member", member)
                .finish(),
            Self::Index { target, index } => f
                .debug_struct("Index")
                .field("target", target)
                .field("index", index)
                .finish(),
            Self::Unary { op, operand } => f
                .debug_struct("Unary")
                .field("op", op)
                .field("operand", operand)
                .finish(),
            Self::Binary { op, lhs, rhs } => f
                .debug_struct("Binary")
                .field("op", op)
                .field("lhs", lhs)
                .field("rhs", rhs)
                .finish(),
            Self::Conditional {
                condition,
                when_true,
                when_false,
            } => f
                .debug_struct("Conditional")
                .field("condition", condition)
                .field("when_true", when_true)
                .field("when_false", when_false)
                .finish(),
            Self::Coalesce { value, fallback } => f
                .debug_struct("Coalesce")
                .field("value", value)
                .field("fallback", fallback)
                .finish(),
            Self::Array(elements) => f.debug_tuple("Array").field(elements).finish(),
            Self::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
            Self::Call(call) => f.debug_tuple("Call").field(call).finish(),
            Self::Deferred { label, .. } => write!(f, "Deferred({label})"),
        }
    }
}

/// Typed invocation expression `|handler: &H| body`.
///
/// `H` documents the caller's intent only; the invoked method identity
/// carries the declaring type that resolution uses.
pub struct Invocation<H: ?Sized> {
    body: Expr,
    _handler: PhantomData<fn(&H)>,
}

impl<H: RouteHandler + ?Sized> Invocation<H> {
    /// Invocation with an arbitrary body; the analyzer validates its shape
    #[must_use]
    pub fn new(body: Expr) -> Self {
        Self {
            body,
            _handler: PhantomData,
        }
    }

    /// `handler => handler.method(arguments...)`
    pub fn call(method: MethodIdentity, arguments: impl IntoIterator<Item = Expr>) -> Self {
        Self::new(Expr::call(Expr::Parameter, method, arguments))
    }

    #[must_use]
    pub fn body(&self) -> &Expr {
        &self.body
    }

    #[must_use]
    pub fn handler_type() -> HandlerType {
        HandlerType::of::<H>()
    }
}

impl<H: ?Sized> Clone for Invocation<H> {
    fn clone(&self) -> Self {
        Self {
            body: self.body.clone(),
            _handler: PhantomData,
        }
    }
}

impl<H: ?Sized> fmt::Debug for Invocation<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("handler", &std::any::type_name::<H>())
            .field("body", &self.body)
            .finish()
    }
}
