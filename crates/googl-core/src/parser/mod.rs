//! Expression Parser
//!
//! Zero-copy recursive-descent parser for arithmetic input. The grammar is
//! deliberately wider than what the evaluator accepts: attribute access,
//! subscripts, comparisons, keyword statements and the like all parse, so
//! that rejecting them is a safelist decision in [`crate::eval`] rather than
//! an accident of syntax.
//!
//! # Grammar
//!
//! ```text
//! program    ::= (statement (SEP statement)*)?
//! statement  ::= KEYWORD ...
//!              | exprlist ("=" exprlist)*
//!              | exprlist AUGASSIGN exprlist
//! exprlist   ::= expr ("," expr)* [","]
//! expr       ::= bitor (COMPARE bitor)*
//! bitor      ::= bitand ("|" bitand)*
//! bitand     ::= shift ("&" shift)*
//! shift      ::= arith (("<<" | ">>") arith)*
//! arith      ::= term (("+" | "-") term)*
//! term       ::= factor (("*" | "/" | "//" | "%" | "@") factor)*
//! factor     ::= ("+" | "-" | "~") factor | power
//! power      ::= primary ["**" factor]
//! primary    ::= atom ("(" args ")" | "." NAME | "[" exprlist "]")*
//! atom       ::= NUMBER | NAME | STRING | "(" [exprlist] ")" | "[" .. "]" | "{" .. "}"
//! ```
//!
//! # Example
//!
//! ```rust
//! use googl_core::parser::{Parser, Stmt};
//!
//! let program = Parser::parse("x = 2 ** 3").unwrap();
//! assert!(matches!(program.statements[0], Stmt::Assign { .. }));
//! ```

mod ast;
mod lexer;
mod token;

pub use ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
pub use lexer::Lexer;
pub use token::{Token, TokenKind};

use thiserror::Error;

/// Parser errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} at position {position}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("unterminated string literal at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid number literal '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("empty input")]
    EmptyInput,

    #[error("expression nested too deeply at position {position}")]
    TooDeep { position: usize },

    #[error("expression too large at position {position}")]
    TooLarge { position: usize },
}

/// Deepest allowed nesting of parentheses, brackets and unary operators.
///
/// Each level costs a dozen stack frames in the descent; the bound keeps
/// unoptimized builds inside the main thread's stack.
pub const MAX_DEPTH: usize = 100;

/// Most compound nodes a single input may produce. Bounds the height of
/// left-leaning operator chains, which the evaluator walks recursively.
pub const MAX_NODES: usize = 1000;

/// Reserved words that are values rather than statements
fn literal_keyword(text: &str) -> Option<f64> {
    match text {
        "True" => Some(1.0),
        "False" => Some(0.0),
        _ => None,
    }
}

/// Recursive-descent parser over the token stream
pub struct Parser<'a> {
    lexer: std::iter::Peekable<Lexer<'a>>,
    current_position: usize,
    depth: usize,
    nodes: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser from input string
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input).peekable(),
            current_position: 0,
            depth: 0,
            nodes: 0,
        }
    }

    /// Parse input string directly
    pub fn parse(input: &'a str) -> Result<Program<'a>, ParseError> {
        Parser::new(input).run()
    }

    /// Run the parser over the whole input
    pub fn run(mut self) -> Result<Program<'a>, ParseError> {
        let mut program = Program::new();

        loop {
            self.skip_separators();
            if self.at_eof() {
                break;
            }

            program.statements.push(self.parse_statement()?);

            match self.peek_kind() {
                TokenKind::Separator | TokenKind::Eof => {}
                _ => return Err(self.unexpected("end of statement")),
            }
        }

        if program.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        Ok(program)
    }

    fn peek(&mut self) -> Option<&Token<'a>> {
        self.lexer.peek()
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.peek().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.lexer.next();
        if let Some(ref t) = token {
            self.current_position = t.offset;
        }
        token
    }

    fn at_eof(&mut self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    fn skip_separators(&mut self) {
        while self.peek_kind() == TokenKind::Separator {
            self.next();
        }
    }

    /// Consume the next token if it has the given kind
    fn eat(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        if self.peek_kind() == kind {
            self.next()
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(&kind.to_string())),
        }
    }

    /// Build an error describing the next token
    fn unexpected(&mut self, expected: &str) -> ParseError {
        let fallback = self.current_position;
        match self.peek() {
            Some(t) if t.kind == TokenKind::Unknown && t.text.starts_with(['\'', '"']) => {
                ParseError::UnterminatedString { position: t.offset }
            }
            Some(t) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: match t.kind {
                    TokenKind::Eof => t.kind.to_string(),
                    _ => format!("'{}'", t.text),
                },
                position: t.offset,
            },
            None => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: TokenKind::Eof.to_string(),
                position: fallback,
            },
        }
    }

    /// Count one compound node against [`MAX_NODES`]
    fn add_node(&mut self) -> Result<(), ParseError> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(ParseError::TooLarge {
                position: self.current_position,
            });
        }
        Ok(())
    }

    fn parse_statement(&mut self) -> Result<Stmt<'a>, ParseError> {
        let statement_keyword = self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Keyword && literal_keyword(t.text).is_none());
        if statement_keyword {
            let keyword = self.expect(TokenKind::Keyword)?;
            // Body is irrelevant: keyword statements are never evaluated
            while !matches!(self.peek_kind(), TokenKind::Separator | TokenKind::Eof) {
                self.next();
            }
            return Ok(Stmt::Keyword(keyword.text));
        }

        let first = self.parse_exprlist()?;

        if let Some(op) = self.eat(TokenKind::AugAssign) {
            let value = self.parse_exprlist()?;
            return Ok(Stmt::AugAssign {
                target: first,
                op: op.text,
                value,
            });
        }

        if self.peek_kind() != TokenKind::Assign {
            return Ok(Stmt::Expr(first));
        }

        let mut targets = vec![first];
        while self.eat(TokenKind::Assign).is_some() {
            targets.push(self.parse_exprlist()?);
        }
        // The right-most element is the value, everything before it a target
        let value = targets.pop().ok_or(ParseError::EmptyInput)?;
        Ok(Stmt::Assign { targets, value })
    }

    fn parse_exprlist(&mut self) -> Result<Expr<'a>, ParseError> {
        let first = self.parse_expr()?;
        if self.peek_kind() != TokenKind::Comma {
            return Ok(first);
        }

        let mut items = vec![first];
        while self.eat(TokenKind::Comma).is_some() {
            if !self.starts_expr() {
                break;
            }
            items.push(self.parse_expr()?);
        }
        Ok(Expr::Collection(items))
    }

    /// Whether the next token can begin an expression
    fn starts_expr(&mut self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Number
                | TokenKind::Identifier
                | TokenKind::Str
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Tilde
        )
    }

    fn parse_expr(&mut self) -> Result<Expr<'a>, ParseError> {
        let first = self.parse_bitor()?;
        if !self.peek_kind().is_comparison() {
            return Ok(first);
        }

        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while self.peek_kind().is_comparison() {
            self.add_node()?;
            if let Some(op) = self.next() {
                ops.push(op.text);
            }
            comparators.push(self.parse_bitor()?);
        }
        Ok(Expr::Compare {
            first: Box::new(first),
            ops,
            comparators,
        })
    }

    /// Parse one left-associative precedence level
    fn parse_binary_level(
        &mut self,
        operators: &[(TokenKind, BinaryOp)],
        operand: fn(&mut Self) -> Result<Expr<'a>, ParseError>,
    ) -> Result<Expr<'a>, ParseError> {
        let mut left = operand(self)?;
        loop {
            let kind = self.peek_kind();
            let op = match operators.iter().find(|(k, _)| *k == kind) {
                Some((_, op)) => *op,
                None => return Ok(left),
            };
            self.next();
            self.add_node()?;
            let right = operand(self)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_bitor(&mut self) -> Result<Expr<'a>, ParseError> {
        self.parse_binary_level(&[(TokenKind::Pipe, BinaryOp::BitOr)], Self::parse_bitand)
    }

    fn parse_bitand(&mut self) -> Result<Expr<'a>, ParseError> {
        self.parse_binary_level(&[(TokenKind::Amp, BinaryOp::BitAnd)], Self::parse_shift)
    }

    fn parse_shift(&mut self) -> Result<Expr<'a>, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::LShift, BinaryOp::LShift),
                (TokenKind::RShift, BinaryOp::RShift),
            ],
            Self::parse_arith,
        )
    }

    fn parse_arith(&mut self) -> Result<Expr<'a>, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::Plus, BinaryOp::Add),
                (TokenKind::Minus, BinaryOp::Sub),
            ],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> Result<Expr<'a>, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::Star, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
                (TokenKind::DoubleSlash, BinaryOp::FloorDiv),
                (TokenKind::Percent, BinaryOp::Mod),
                (TokenKind::At, BinaryOp::MatMul),
            ],
            Self::parse_factor,
        )
    }

    /// Every nesting level passes through here, so this is where depth is
    /// counted.
    fn parse_factor(&mut self) -> Result<Expr<'a>, ParseError> {
        self.depth += 1;
        let result = if self.depth > MAX_DEPTH {
            let fallback = self.current_position;
            let position = self.peek().map_or(fallback, |t| t.offset);
            Err(ParseError::TooDeep { position })
        } else {
            self.parse_unary()
        };
        self.depth -= 1;
        result
    }

    fn parse_unary(&mut self) -> Result<Expr<'a>, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            TokenKind::Tilde => UnaryOp::Invert,
            _ => return self.parse_power(),
        };
        self.next();
        self.add_node()?;
        let operand = self.parse_factor()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> Result<Expr<'a>, ParseError> {
        let base = self.parse_primary()?;
        if self.eat(TokenKind::DoubleStar).is_none() {
            return Ok(base);
        }
        self.add_node()?;
        // Right-associative, and the exponent may carry its own sign
        let exponent = self.parse_factor()?;
        Ok(Expr::Binary {
            op: BinaryOp::Pow,
            left: Box::new(base),
            right: Box::new(exponent),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr<'a>, ParseError> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    self.next();
                    self.add_node()?;
                    let (args, keywords) = self.parse_call_args()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        keywords,
                    };
                }
                TokenKind::Dot => {
                    self.next();
                    self.add_node()?;
                    let attr = self.expect(TokenKind::Identifier)?;
                    expr = Expr::Attribute {
                        value: Box::new(expr),
                        attr: attr.text,
                    };
                }
                TokenKind::LBracket => {
                    self.next();
                    self.add_node()?;
                    let index = self.parse_exprlist()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Subscript {
                        value: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn parse_call_args(
        &mut self,
    ) -> Result<(Vec<Expr<'a>>, Vec<(&'a str, Expr<'a>)>), ParseError> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();

        while self.peek_kind() != TokenKind::RParen {
            let arg = self.parse_expr()?;
            match arg {
                Expr::Ident(name) if self.peek_kind() == TokenKind::Assign => {
                    self.next();
                    keywords.push((name, self.parse_expr()?));
                }
                arg => args.push(arg),
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok((args, keywords))
    }

    fn parse_atom(&mut self) -> Result<Expr<'a>, ParseError> {
        match self.peek_kind() {
            TokenKind::Number => {
                let token = self.expect(TokenKind::Number)?;
                parse_number(token.text)
                    .map(Expr::Number)
                    .ok_or_else(|| ParseError::InvalidNumber {
                        text: token.text.to_string(),
                        position: token.offset,
                    })
            }
            TokenKind::Identifier => {
                let token = self.expect(TokenKind::Identifier)?;
                Ok(Expr::Ident(token.text))
            }
            TokenKind::Str => {
                let token = self.expect(TokenKind::Str)?;
                Ok(Expr::Str(token.text))
            }
            TokenKind::Keyword => {
                match self.peek().and_then(|t| literal_keyword(t.text)) {
                    Some(value) => {
                        self.next();
                        Ok(Expr::Number(value))
                    }
                    None => Err(self.unexpected("expression")),
                }
            }
            TokenKind::LParen => {
                self.next();
                if self.eat(TokenKind::RParen).is_some() {
                    return Ok(Expr::Collection(Vec::new()));
                }
                let inner = self.parse_exprlist()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_collection(TokenKind::RBracket),
            TokenKind::LBrace => self.parse_collection(TokenKind::RBrace),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `[a, b]` or `{a, b}`; both are rejected later as collections
    fn parse_collection(&mut self, close: TokenKind) -> Result<Expr<'a>, ParseError> {
        self.next();
        self.add_node()?;
        let mut items = Vec::new();
        while self.peek_kind() != close {
            items.push(self.parse_expr()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(close)?;
        Ok(Expr::Collection(items))
    }
}

/// Convert a number token to its value.
///
/// Accepts decimal integers and floats with optional exponent, `_` digit
/// separators and `0x`/`0o`/`0b` integer prefixes.
fn parse_number(text: &str) -> Option<f64> {
    if text.starts_with('_') || text.ends_with('_') || text.contains("__") {
        return None;
    }
    let cleaned = text.replace('_', "");

    let radix = match cleaned.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&cleaned[2..], radix)
            .ok()
            .map(|v| v as f64);
    }

    if !cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    cleaned.parse::<f64>().ok()
}
