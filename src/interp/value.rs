//! Runtime values for the interpreter

use std::fmt;

use serde::Serialize;

use crate::ast::{BinaryOp, Number, UnaryOp};
use crate::common::Span;
use crate::diagnostics::{CompileError, Result};

const I64_MIN: f64 = i64::MIN as f64;

/// Runtime value
///
/// Integers stay exact until they meet a real operand or `/`, at which point
/// the result is promoted to a real.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit float
    Real(f64),
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
        }
    }

    /// Numeric value as a float
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Integer(n) => *n as f64,
            Value::Real(r) => *r,
        }
    }

    /// Numeric value with any fractional part dropped; `None` when a real
    /// is not finite or lies outside the integer range
    pub fn truncate(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            // `i64::MIN as f64` is exactly -2^63; `as` would saturate past it
            Value::Real(r) if r.is_finite() && *r >= I64_MIN && *r < -I64_MIN => {
                Some(r.trunc() as i64)
            }
            Value::Real(_) => None,
        }
    }

    /// Apply a binary operator; `span` locates the operator for errors
    pub fn binary(self, op: BinaryOp, rhs: Value, span: Span) -> Result<Value> {
        let overflow = || CompileError::IntegerOverflow { span: span.into() };

        match op {
            BinaryOp::IntDiv => {
                let (a, b) = match (self.truncate(), rhs.truncate()) {
                    (Some(a), Some(b)) => (a, b),
                    _ => return Err(overflow()),
                };
                if b == 0 {
                    return Err(CompileError::DivisionByZero { span: span.into() });
                }
                a.checked_div(b).map(Value::Integer).ok_or_else(overflow)
            }
            BinaryOp::FloatDiv => Ok(Value::Real(self.as_f64() / rhs.as_f64())),
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => match (self, rhs) {
                (Value::Integer(a), Value::Integer(b)) => {
                    let result = match op {
                        BinaryOp::Add => a.checked_add(b),
                        BinaryOp::Sub => a.checked_sub(b),
                        _ => a.checked_mul(b),
                    };
                    result.map(Value::Integer).ok_or_else(overflow)
                }
                _ => {
                    let (a, b) = (self.as_f64(), rhs.as_f64());
                    Ok(Value::Real(match op {
                        BinaryOp::Add => a + b,
                        BinaryOp::Sub => a - b,
                        _ => a * b,
                    }))
                }
            },
        }
    }

    /// Apply a unary sign
    pub fn unary(self, op: UnaryOp, span: Span) -> Result<Value> {
        match (op, self) {
            (UnaryOp::Plus, v) => Ok(v),
            (UnaryOp::Neg, Value::Integer(n)) => n
                .checked_neg()
                .map(Value::Integer)
                .ok_or(CompileError::IntegerOverflow { span: span.into() }),
            (UnaryOp::Neg, Value::Real(r)) => Ok(Value::Real(-r)),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Integer(n) => Value::Integer(n),
            Number::Real(r) => Value::Real(r),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Real(r) => write!(f, "{:?}", r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(a: Value, op: BinaryOp, b: Value) -> Result<Value> {
        a.binary(op, b, Span::default())
    }

    #[test]
    fn test_int_div_truncates() {
        assert_eq!(
            apply(Value::Integer(10), BinaryOp::IntDiv, Value::Integer(4)).unwrap(),
            Value::Integer(2)
        );
        assert_eq!(
            apply(Value::Real(7.9), BinaryOp::IntDiv, Value::Real(2.5)).unwrap(),
            Value::Integer(3)
        );
        assert_eq!(
            apply(Value::Integer(-7), BinaryOp::IntDiv, Value::Integer(2)).unwrap(),
            Value::Integer(-3)
        );
    }

    #[test]
    fn test_float_div_is_real() {
        let v = apply(Value::Integer(20), BinaryOp::FloatDiv, Value::Integer(7)).unwrap();
        assert!((v.as_f64() - 2.857142857).abs() < 1e-9);
        assert_eq!(v.type_name(), "REAL");
    }

    #[test]
    fn test_promotion() {
        assert_eq!(
            apply(Value::Integer(1), BinaryOp::Add, Value::Real(0.5)).unwrap(),
            Value::Real(1.5)
        );
        assert_eq!(
            apply(Value::Integer(2), BinaryOp::Mul, Value::Integer(3)).unwrap(),
            Value::Integer(6)
        );
    }

    #[test]
    fn test_int_div_by_zero() {
        let err = apply(Value::Integer(1), BinaryOp::IntDiv, Value::Real(0.5)).unwrap_err();
        assert!(matches!(err, CompileError::DivisionByZero { .. }));
    }

    #[test]
    fn test_int_div_of_non_finite_real() {
        for dividend in [f64::INFINITY, f64::NAN, 1e300] {
            let err = apply(Value::Real(dividend), BinaryOp::IntDiv, Value::Integer(1)).unwrap_err();
            assert!(matches!(err, CompileError::IntegerOverflow { .. }));
        }
        let err = apply(Value::Integer(1), BinaryOp::IntDiv, Value::Real(f64::NEG_INFINITY)).unwrap_err();
        assert!(matches!(err, CompileError::IntegerOverflow { .. }));
    }

    #[test]
    fn test_overflow() {
        let err = apply(Value::Integer(i64::MAX), BinaryOp::Add, Value::Integer(1)).unwrap_err();
        assert!(matches!(err, CompileError::IntegerOverflow { .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(15).to_string(), "15");
        assert_eq!(Value::Real(3.0).to_string(), "3.0");
    }
}
