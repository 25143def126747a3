//! Evaluation results

use std::fmt;

use super::registry::Function;

/// Result of evaluating an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    /// A safelisted function referenced by name without being called
    Function(&'static Function),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Function(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => fmt_number(*n, f),
            Value::Function(func) => write!(f, "<built-in function {}>", func.name()),
        }
    }
}

/// Integral values print without a fraction, very large or very small
/// magnitudes in scientific notation.
fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        return write!(f, "nan");
    }
    if n.is_infinite() {
        return write!(f, "{}", if n > 0.0 { "inf" } else { "-inf" });
    }

    let magnitude = n.abs();
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        write!(f, "{:e}", n)
    } else if n.fract() == 0.0 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}
