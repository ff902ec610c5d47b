//! # Expression Analyzer
//!
//! Validates the shape of a typed invocation and extracts the invoked method
//! identity together with its non-null argument values.
//!
//! ```text
//! Invocation<H> ──► body is Call? ──► has receiver? ──► arity matches? ──► per argument:
//!                     │ no              │ no               │ no              Constant → take value
//!                     ▼                 ▼                  ▼                 other    → Evaluator
//!             InvalidExpressionShape  StaticInvocation  InvalidExpressionShape   Null → dropped
//! ```

use super::ast::{Expr, Invocation, MethodCall};
use super::evaluator::Evaluator;
use crate::error::{ResolveError, Result};
use crate::models::{MethodIdentity, RouteHandler};
use serde_json::Value;
use tracing::{debug, trace};

/// A non-null argument value paired with its declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentValue {
    /// Zero-based position in the call
    pub position: usize,
    /// Parameter name as declared by the invoked method identity
    pub parameter: String,
    pub value: Value,
}

/// Method identity and argument values extracted from an invocation
#[derive(Debug, Clone)]
pub struct AnalyzedInvocation {
    pub method: MethodIdentity,
    pub arguments: Vec<ArgumentValue>,
}

impl AnalyzedInvocation {
    /// Declared parameter names in declaration order, including those whose
    /// arguments were null
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.method.parameter_names()
    }
}

/// Extracts method identities and argument values from invocations
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionAnalyzer {
    evaluator: Evaluator,
}

impl ExpressionAnalyzer {
    #[must_use]
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }

    #[must_use]
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Analyze a typed invocation.
    ///
    /// `H` is advisory: the declaring type carried by the invoked method
    /// identity selects the dispatch target. A call whose method belongs to a
    /// different handler type is still analyzed and logged at debug level.
    pub fn analyze<H: RouteHandler + ?Sized>(
        &self,
        invocation: &Invocation<H>,
    ) -> Result<AnalyzedInvocation> {
        let analyzed = self.analyze_body(invocation.body())?;
        let invoked_on = Invocation::<H>::handler_type();
        if analyzed.method.declaring_type() != invoked_on {
            debug!(
                method = %analyzed.method,
                invocation_handler = %invoked_on,
                declaring_handler = %analyzed.method.declaring_type(),
                "Invocation handler type differs from the method's declaring type"
            );
        }
        Ok(analyzed)
    }

    /// Analyze an untyped invocation body
    pub fn analyze_body(&self, body: &Expr) -> Result<AnalyzedInvocation> {
        let call = match body {
            Expr::Call(call) => call,
            other => {
                return Err(ResolveError::invalid_shape(format!(
                    "expected a method call on the handler, found {}",
                    other.kind()
                )))
            }
        };

        if call.receiver.is_none() {
            return Err(ResolveError::StaticInvocationNotSupported {
                method: call.method.clone(),
            });
        }

        let arguments = self.argument_values(call)?;
        Ok(AnalyzedInvocation {
            method: call.method.clone(),
            arguments,
        })
    }

    fn argument_values(&self, call: &MethodCall) -> Result<Vec<ArgumentValue>> {
        let declared = call.method.parameters();
        if declared.len() != call.arguments.len() {
            return Err(ResolveError::invalid_shape(format!(
                "{} declares {} parameter(s) but the call passes {} argument(s)",
                call.method,
                declared.len(),
                call.arguments.len()
            )));
        }

        let mut values = Vec::with_capacity(declared.len());
        for (position, (parameter, argument)) in declared.iter().zip(&call.arguments).enumerate() {
            let value = match argument {
                Expr::Constant(value) => value.clone(),
                other => {
                    trace!(
                        parameter = %parameter.name,
                        node = other.kind(),
                        "Evaluating non-constant argument"
                    );
                    self.evaluator.evaluate(other)?
                }
            };

            if value.is_null() {
                continue;
            }
            values.push(ArgumentValue {
                position,
                parameter: parameter.name.clone(),
                value,
            });
        }
        Ok(values)
    }
}
