//! # Invocation Expressions
//!
//! Typed invocation expressions, the argument evaluator and the analyzer that
//! turns an invocation into a method identity plus argument values.

pub mod analyzer;
pub mod ast;
pub mod evaluator;

pub use analyzer::{AnalyzedInvocation, ArgumentValue, ExpressionAnalyzer};
pub use ast::{BinaryOp, Expr, Invocation, MethodCall, Thunk, UnaryOp};
pub use evaluator::Evaluator;
