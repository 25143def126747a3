//! Token types for the expression lexer

use std::fmt;

/// Token kinds in the expression language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Identifiers and literals
    Identifier,
    Number,
    Str,

    /// Reserved word (`import`, `for`, `lambda`, ...)
    Keyword,

    // Arithmetic
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    At,

    // Bitwise
    Amp,
    Pipe,
    Tilde,
    LShift,
    RShift,

    // Comparison
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    NotEq,

    // Assignment
    Assign,
    AugAssign,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Colon,

    /// Statement separator: newline or `;`
    Separator,

    // Special
    Eof,
    Unknown,
}

impl TokenKind {
    /// Check if this token can only appear in a comparison chain
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Le
                | TokenKind::Ge
                | TokenKind::EqEq
                | TokenKind::NotEq
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::Str => write!(f, "string literal"),
            TokenKind::Keyword => write!(f, "keyword"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::DoubleStar => write!(f, "'**'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::DoubleSlash => write!(f, "'//'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::At => write!(f, "'@'"),
            TokenKind::Amp => write!(f, "'&'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Tilde => write!(f, "'~'"),
            TokenKind::LShift => write!(f, "'<<'"),
            TokenKind::RShift => write!(f, "'>>'"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::AugAssign => write!(f, "augmented assignment"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Separator => write!(f, "statement separator"),
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Unknown => write!(f, "unknown character"),
        }
    }
}

/// A token with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Self { kind, text, offset }
    }

    pub fn eof(offset: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: "",
            offset,
        }
    }
}
