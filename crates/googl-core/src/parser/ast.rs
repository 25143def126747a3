//! AST types for parsed expression programs
//!
//! The tree borrows identifier and literal text from the input, so it lives
//! exactly as long as the evaluation call that parsed it.

use std::fmt;

/// Binary operators recognised by the grammar.
///
/// Only a subset is evaluated; the rest exist so the evaluator can reject
/// them by name instead of failing with a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    FloorDiv,
    MatMul,
    LShift,
    RShift,
    BitAnd,
    BitOr,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
            BinaryOp::Mod => "%",
            BinaryOp::FloorDiv => "//",
            BinaryOp::MatMul => "@",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
        };
        write!(f, "{}", symbol)
    }
}

/// Unary operators recognised by the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Invert,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "unary -"),
            UnaryOp::Pos => write!(f, "unary +"),
            UnaryOp::Invert => write!(f, "unary ~"),
        }
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Number(f64),
    Ident(&'a str),
    Str(&'a str),
    Binary {
        op: BinaryOp,
        left: Box<Expr<'a>>,
        right: Box<Expr<'a>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr<'a>>,
    },
    Call {
        callee: Box<Expr<'a>>,
        args: Vec<Expr<'a>>,
        keywords: Vec<(&'a str, Expr<'a>)>,
    },
    Attribute {
        value: Box<Expr<'a>>,
        attr: &'a str,
    },
    Subscript {
        value: Box<Expr<'a>>,
        index: Box<Expr<'a>>,
    },
    /// Comparison chain, e.g. `a < b <= c`
    Compare {
        first: Box<Expr<'a>>,
        ops: Vec<&'a str>,
        comparators: Vec<Expr<'a>>,
    },
    /// Bracketed or comma-separated collection: `(a, b)`, `[a]`, `{a}`
    Collection(Vec<Expr<'a>>),
}

impl<'a> Expr<'a> {
    /// Short description used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Number(_) => "number",
            Expr::Ident(_) => "name",
            Expr::Str(_) => "string literal",
            Expr::Binary { .. } => "binary operation",
            Expr::Unary { .. } => "unary operation",
            Expr::Call { .. } => "call",
            Expr::Attribute { .. } => "attribute access",
            Expr::Subscript { .. } => "subscript",
            Expr::Compare { .. } => "comparison",
            Expr::Collection(_) => "collection",
        }
    }
}

/// Top-level statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    /// Bare expression
    Expr(Expr<'a>),
    /// `t1 = t2 = ... = value`
    Assign {
        targets: Vec<Expr<'a>>,
        value: Expr<'a>,
    },
    /// `target op= value`
    AugAssign {
        target: Expr<'a>,
        op: &'a str,
        value: Expr<'a>,
    },
    /// Statement introduced by a reserved word (`import`, `for`, ...)
    Keyword(&'a str),
}

/// A parsed input: statements in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program<'a> {
    pub statements: Vec<Stmt<'a>>,
}

impl<'a> Program<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }
}
