//! # Argument Evaluator
//!
//! AST-walking interpreter for argument sub-expressions. Each node is
//! evaluated at most once, left to right; `&&`, `||`, `?:` and `??` only
//! evaluate the branch they need. The evaluator holds no mutable state, so one
//! instance serves any number of threads.

use super::ast::{BinaryOp, Expr, UnaryOp};
use crate::constants::DEFAULT_MAX_EXPRESSION_DEPTH;
use crate::error::EvaluationError;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

type EvalResult = Result<Value, EvaluationError>;

/// Interpreter for argument expressions
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    max_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXPRESSION_DEPTH)
    }
}

impl Evaluator {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluate an expression to a concrete value
    pub fn evaluate(&self, expr: &Expr) -> EvalResult {
        self.eval(expr, 0)
    }

    fn eval(&self, expr: &Expr, depth: usize) -> EvalResult {
        if depth >= self.max_depth {
            return Err(EvaluationError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        let next = depth + 1;

        match expr {
            Expr::Constant(value) => Ok(value.clone()),
            Expr::Parameter => Err(EvaluationError::UnboundParameter),
            Expr::Captured { value, .. } => Ok(value.clone()),
            Expr::Member { target, member } => {
                let target = self.eval(target, next)?;
                member_of(&target, member)
            }
            Expr::Index { target, index } => {
                let target = self.eval(target, next)?;
                let index = self.eval(index, next)?;
                index_into(&target, &index)
            }
            Expr::Unary { op, operand } => {
                let operand = self.eval(operand, next)?;
                eval_unary(*op, operand)
            }
            Expr::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs, next),
            Expr::Conditional {
                condition,
                when_true,
                when_false,
            } => match self.eval(condition, next)? {
                Value::Bool(true) => self.eval(when_true, next),
                Value::Bool(false) => self.eval(when_false, next),
                other => Err(EvaluationError::type_mismatch(
                    "conditional",
                    "bool",
                    type_name(&other),
                )),
            },
            Expr::Coalesce { value, fallback } => match self.eval(value, next)? {
                Value::Null => self.eval(fallback, next),
                present => Ok(present),
            },
            Expr::Array(elements) => elements
                .iter()
                .map(|element| self.eval(element, next))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expr::Object(fields) => {
                let mut object = Map::with_capacity(fields.len());
                for (name, field) in fields {
                    object.insert(name.clone(), self.eval(field, next)?);
                }
                Ok(Value::Object(object))
            }
            Expr::Call(call) => Err(EvaluationError::UnsupportedNode {
                node: format!("method call {}", call.method),
            }),
            Expr::Deferred { thunk, .. } => (thunk.as_ref())(),
        }
    }

    fn eval_binary(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr, depth: usize) -> EvalResult {
        match op {
            BinaryOp::And | BinaryOp::Or => {
                let left = expect_bool(op, self.eval(lhs, depth)?)?;
                if (op == BinaryOp::And && !left) || (op == BinaryOp::Or && left) {
                    return Ok(Value::Bool(left));
                }
                let right = expect_bool(op, self.eval(rhs, depth)?)?;
                Ok(Value::Bool(right))
            }
            _ => {
                let left = self.eval(lhs, depth)?;
                let right = self.eval(rhs, depth)?;
                eval_strict_binary(op, left, right)
            }
        }
    }
}

/// Integers are widened so that the full `i64` and `u64` ranges stay exact.
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i128),
    Float(f64),
}

impl Num {
    fn from_value(value: &Value) -> Option<Self> {
        let Value::Number(n) = value else {
            return None;
        };
        n.as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .map(Num::Int)
            .or_else(|| n.as_f64().map(Num::Float))
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_bool(op: BinaryOp, value: Value) -> Result<bool, EvaluationError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EvaluationError::type_mismatch(
            op.symbol(),
            "bool",
            type_name(&other),
        )),
    }
}

fn float_value(operation: &str, f: f64) -> EvalResult {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| EvaluationError::NonFiniteNumber {
            operation: operation.to_string(),
        })
}

fn int_value(operation: &str, i: i128) -> EvalResult {
    if let Ok(i) = i64::try_from(i) {
        Ok(Value::from(i))
    } else if let Ok(u) = u64::try_from(i) {
        Ok(Value::from(u))
    } else {
        Err(EvaluationError::Overflow {
            operation: operation.to_string(),
        })
    }
}

fn member_of(target: &Value, member: &str) -> EvalResult {
    match target {
        Value::Object(object) => {
            object
                .get(member)
                .cloned()
                .ok_or_else(|| EvaluationError::MemberNotFound {
                    member: member.to_string(),
                    found: "object".to_string(),
                })
        }
        Value::Null => Err(EvaluationError::NullReference {
            member: member.to_string(),
        }),
        other => Err(EvaluationError::type_mismatch(
            format!("member access '{member}'"),
            "object",
            type_name(other),
        )),
    }
}

fn index_into(target: &Value, index: &Value) -> EvalResult {
    match (target, index) {
        (Value::Null, _) => Err(EvaluationError::NullReference {
            member: format!("[{index}]"),
        }),
        (Value::Array(elements), Value::Number(n)) => {
            let position = n.as_i64().ok_or_else(|| {
                EvaluationError::type_mismatch("index", "integer", "non-integer number")
            })?;
            usize::try_from(position)
                .ok()
                .and_then(|i| elements.get(i))
                .cloned()
                .ok_or(EvaluationError::IndexOutOfRange {
                    index: position,
                    len: elements.len(),
                })
        }
        (Value::Object(_), Value::String(key)) => member_of(target, key),
        (Value::Array(_), other) => Err(EvaluationError::type_mismatch(
            "index",
            "integer",
            type_name(other),
        )),
        (Value::Object(_), other) => Err(EvaluationError::type_mismatch(
            "index",
            "string",
            type_name(other),
        )),
        (other, _) => Err(EvaluationError::type_mismatch(
            "index",
            "array or object",
            type_name(other),
        )),
    }
}

fn eval_unary(op: UnaryOp, operand: Value) -> EvalResult {
    match (op, &operand) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Number(_)) => match Num::from_value(&operand) {
            Some(Num::Int(i)) => int_value("-", -i),
            Some(Num::Float(f)) => float_value("-", -f),
            None => Err(EvaluationError::type_mismatch("-", "number", "number")),
        },
        (UnaryOp::Not, other) => Err(EvaluationError::type_mismatch(
            "!",
            "bool",
            type_name(other),
        )),
        (UnaryOp::Neg, other) => Err(EvaluationError::type_mismatch(
            "-",
            "number",
            type_name(other),
        )),
    }
}

fn eval_strict_binary(op: BinaryOp, left: Value, right: Value) -> EvalResult {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOp::Ne => Ok(Value::Bool(!values_equal(&left, &right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(op, &left, &right)?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::Add if left.is_string() || right.is_string() => {
            Ok(Value::String(format!("{}{}", text_of(&left), text_of(&right))))
        }
        _ => arithmetic(op, &left, &right),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (Num::from_value(left), Num::from_value(right)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => a == b,
        (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Ordering, EvaluationError> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => match (Num::from_value(left), Num::from_value(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(a.cmp(&b)),
            (Some(a), Some(b)) => a.as_f64().partial_cmp(&b.as_f64()).ok_or_else(|| {
                EvaluationError::NonFiniteNumber {
                    operation: op.symbol().to_string(),
                }
            }),
            _ => Err(EvaluationError::type_mismatch(
                op.symbol(),
                "two numbers or two strings",
                format!("{} and {}", type_name(left), type_name(right)),
            )),
        },
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let symbol = op.symbol();
    let (Some(a), Some(b)) = (Num::from_value(left), Num::from_value(right)) else {
        return Err(EvaluationError::type_mismatch(
            symbol,
            "numbers",
            format!("{} and {}", type_name(left), type_name(right)),
        ));
    };

    match (a, b) {
        (Num::Int(a), Num::Int(b)) => {
            if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b == 0 {
                return Err(EvaluationError::DivideByZero {
                    operation: symbol.to_string(),
                });
            }
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div => a.checked_div(b),
                BinaryOp::Rem => a.checked_rem(b),
                _ => unreachable!("non-arithmetic operator {symbol}"),
            };
            result
                .ok_or_else(|| EvaluationError::Overflow {
                    operation: symbol.to_string(),
                })
                .and_then(|value| int_value(symbol, value))
        }
        (a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Rem => a % b,
                _ => unreachable!("non-arithmetic operator {symbol}"),
            };
            float_value(symbol, result)
        }
    }
}
