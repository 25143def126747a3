//! Safelisted Expression Evaluator
//!
//! Interprets a parsed [`Program`] directly. Nothing is ever handed to a
//! general-purpose evaluator: every operator, function and constant has to
//! be in the safelist, and every other syntactic construct is rejected.
//!
//! # Resolution order
//!
//! A bare identifier resolves to, in order:
//!
//! 1. a variable bound by an earlier assignment
//! 2. a safelisted function (as a [`Value::Function`])
//! 3. a named constant (`pi`, `e`, `tau`, `inf`, `nan`)
//!
//! A call only ever looks at the function registry, so `sqrt = 4` followed
//! by `sqrt(16)` still calls the function.
//!
//! # Example
//!
//! ```rust
//! use googl_core::eval::{Evaluator, Value};
//!
//! let mut evaluator = Evaluator::new();
//! assert_eq!(evaluator.evaluate("2^3").unwrap(), Value::Number(8.0));
//!
//! evaluator.evaluate("x = 5").unwrap();
//! assert_eq!(evaluator.attempt("x + 1"), Some(Value::Number(6.0)));
//! assert_eq!(evaluator.attempt("__import__('os')"), None);
//! ```

pub mod registry;
mod value;
mod variables;

pub use registry::{Arity, CallError, Function};
pub use value::Value;
pub use variables::Variables;

use std::borrow::Cow;

use thiserror::Error;
use tracing::debug;

use crate::parser::{BinaryOp, Expr, ParseError, Parser, Program, Stmt, UnaryOp};

/// Evaluation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("unknown variable or function: {0}")]
    UnknownIdentifier(String),

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("function {0} not allowed")]
    DisallowedFunction(String),

    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("invalid assignment target: {0}")]
    InvalidAssignmentTarget(String),

    #[error("{name}() takes {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: Arity,
        got: usize,
    },

    #[error("function {0} used as a number")]
    NotANumber(String),

    #[error("numeric failure: {0}")]
    NumericFailure(String),
}

/// Result type for evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Replace every `^` with `**` ahead of parsing.
///
/// Purely textual: a caret inside a string literal is rewritten too.
pub fn preprocess(input: &str) -> Cow<'_, str> {
    if input.contains('^') {
        Cow::Owned(input.replace('^', "**"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Session-scoped evaluator owning the variable table
#[derive(Debug, Default)]
pub struct Evaluator {
    variables: Variables,
}

impl Evaluator {
    /// Create an evaluator with an empty variable table
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Evaluate every statement of `input` and return the last value.
    ///
    /// Statements run in order against the shared variable table; bindings
    /// made before a failing statement are kept.
    pub fn evaluate(&mut self, input: &str) -> EvalResult<Value> {
        let source = preprocess(input);
        let program = Parser::parse(&source)?;
        self.run(&program)
    }

    /// Soft-failing entry point: `None` means "not a math expression".
    ///
    /// Every error is swallowed here so callers can fall through to the
    /// next handler.
    pub fn attempt(&mut self, input: &str) -> Option<Value> {
        match self.evaluate(input) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(input, error = %e, "not a math expression");
                None
            }
        }
    }

    fn run(&mut self, program: &Program<'_>) -> EvalResult<Value> {
        let mut result = None;
        for stmt in &program.statements {
            result = Some(self.exec(stmt)?);
        }
        result.ok_or(EvalError::Parse(ParseError::EmptyInput))
    }

    fn exec(&mut self, stmt: &Stmt<'_>) -> EvalResult<Value> {
        match stmt {
            Stmt::Expr(expr) => self.eval(expr),
            Stmt::Assign { targets, value } => {
                let name = match targets.as_slice() {
                    [Expr::Ident(name)] => *name,
                    [target] => {
                        return Err(EvalError::InvalidAssignmentTarget(
                            target.describe().to_string(),
                        ))
                    }
                    _ => {
                        return Err(EvalError::InvalidAssignmentTarget(
                            "multiple targets".to_string(),
                        ))
                    }
                };
                let value = self.eval_number(value)?;
                self.variables.set(name, value);
                debug!(name, value, "bound variable");
                Ok(Value::Number(value))
            }
            Stmt::AugAssign { op, .. } => Err(EvalError::UnsupportedExpression(format!(
                "augmented assignment '{}'",
                op
            ))),
            Stmt::Keyword(keyword) => Err(EvalError::UnsupportedExpression(format!(
                "'{}' statement",
                keyword
            ))),
        }
    }

    fn eval(&self, expr: &Expr<'_>) -> EvalResult<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Ident(name) => self.resolve(name),
            Expr::Binary { op, left, right } => {
                let left = self.eval_number(left)?;
                let right = self.eval_number(right)?;
                apply_binary(*op, left, right).map(Value::Number)
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Neg => Ok(Value::Number(-self.eval_number(operand)?)),
                other => Err(EvalError::UnsupportedOperator(other.to_string())),
            },
            Expr::Call {
                callee,
                args,
                keywords,
            } => self.call(callee, args, keywords).map(Value::Number),
            other => Err(EvalError::UnsupportedExpression(
                other.describe().to_string(),
            )),
        }
    }

    fn eval_number(&self, expr: &Expr<'_>) -> EvalResult<f64> {
        match self.eval(expr)? {
            Value::Number(n) => Ok(n),
            Value::Function(f) => Err(EvalError::NotANumber(f.name().to_string())),
        }
    }

    fn resolve(&self, name: &str) -> EvalResult<Value> {
        if let Some(value) = self.variables.get(name) {
            return Ok(Value::Number(value));
        }
        if let Some(function) = registry::function(name) {
            return Ok(Value::Function(function));
        }
        if let Some(value) = registry::constant(name) {
            return Ok(Value::Number(value));
        }
        Err(EvalError::UnknownIdentifier(name.to_string()))
    }

    fn call(
        &self,
        callee: &Expr<'_>,
        args: &[Expr<'_>],
        keywords: &[(&str, Expr<'_>)],
    ) -> EvalResult<f64> {
        let name = match callee {
            Expr::Ident(name) => *name,
            other => {
                return Err(EvalError::UnsupportedExpression(format!(
                    "call through {}",
                    other.describe()
                )))
            }
        };

        let function =
            registry::function(name).ok_or_else(|| EvalError::DisallowedFunction(name.to_string()))?;

        if !keywords.is_empty() {
            return Err(EvalError::UnsupportedExpression(
                "keyword arguments".to_string(),
            ));
        }

        let values = args
            .iter()
            .map(|arg| self.eval_number(arg))
            .collect::<EvalResult<Vec<f64>>>()?;

        function.call(&values).map_err(|e| match e {
            CallError::Arity { expected, got } => EvalError::ArityMismatch {
                name: name.to_string(),
                expected,
                got,
            },
            CallError::Domain(msg) => EvalError::NumericFailure(msg.to_string()),
        })
    }
}

/// Apply a safelisted binary operator.
///
/// Plain IEEE arithmetic except for the zero divisors, which fail. Powers
/// additionally fail on overflow and on results that would be complex.
fn apply_binary(op: BinaryOp, left: f64, right: f64) -> EvalResult<f64> {
    match op {
        BinaryOp::Add => Ok(left + right),
        BinaryOp::Sub => Ok(left - right),
        BinaryOp::Mul => Ok(left * right),
        BinaryOp::Div => {
            if right == 0.0 {
                return Err(EvalError::NumericFailure("division by zero".to_string()));
            }
            Ok(left / right)
        }
        BinaryOp::Mod => {
            if right == 0.0 {
                return Err(EvalError::NumericFailure("modulo by zero".to_string()));
            }
            Ok(floored_mod(left, right))
        }
        BinaryOp::Pow => power(left, right),
        other => Err(EvalError::UnsupportedOperator(other.to_string())),
    }
}

fn power(base: f64, exponent: f64) -> EvalResult<f64> {
    let describe = |what: &str| {
        EvalError::NumericFailure(format!(
            "{} ** {} {}",
            Value::Number(base),
            Value::Number(exponent),
            what
        ))
    };

    if base == 0.0 && exponent < 0.0 {
        return Err(describe("divides by zero"));
    }
    let result = base.powf(exponent);
    if result.is_nan() && !base.is_nan() && !exponent.is_nan() {
        return Err(describe("is not a real number"));
    }
    if result.is_infinite() && base.is_finite() && exponent.is_finite() {
        return Err(describe("overflows"));
    }
    Ok(result)
}

/// Modulo taking the sign of the divisor
fn floored_mod(left: f64, right: f64) -> f64 {
    let r = left % right;
    if r != 0.0 && (r < 0.0) != (right < 0.0) {
        r + right
    } else {
        r
    }
}
