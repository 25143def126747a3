//! Zero-copy lexer for the expression language

use super::token::{Token, TokenKind};

/// Reserved words. Any statement or expression using one is rejected by
/// the parser or the evaluator, so only membership matters here.
const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Operators ordered longest first so the first prefix hit is the right one
const OPERATORS: &[(&str, TokenKind)] = &[
    ("**=", TokenKind::AugAssign),
    ("//=", TokenKind::AugAssign),
    ("<<=", TokenKind::AugAssign),
    (">>=", TokenKind::AugAssign),
    ("**", TokenKind::DoubleStar),
    ("//", TokenKind::DoubleSlash),
    ("<<", TokenKind::LShift),
    (">>", TokenKind::RShift),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("+=", TokenKind::AugAssign),
    ("-=", TokenKind::AugAssign),
    ("*=", TokenKind::AugAssign),
    ("/=", TokenKind::AugAssign),
    ("%=", TokenKind::AugAssign),
    ("@=", TokenKind::AugAssign),
    ("&=", TokenKind::AugAssign),
    ("|=", TokenKind::AugAssign),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("@", TokenKind::At),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("~", TokenKind::Tilde),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("=", TokenKind::Assign),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    (":", TokenKind::Colon),
    (";", TokenKind::Separator),
    ("\n", TokenKind::Separator),
];

/// Zero-copy lexer for expression input
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            done: false,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.remaining().chars().nth(1)
    }

    fn advance(&mut self, n: usize) {
        self.position += n;
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if pred(c) {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Skip blanks and comments. Newlines are significant and stay.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c != '\n' && c.is_whitespace() => self.advance(c.len_utf8()),
                Some('#') => self.advance_while(|c| c != '\n'),
                _ => break,
            }
        }
    }

    fn read_quoted_string(&mut self) -> Token<'a> {
        let start = self.position;
        let quote_char = self.peek_char().unwrap_or('\'');
        self.advance(quote_char.len_utf8());

        let content_start = self.position;
        while let Some(c) = self.peek_char() {
            if c == quote_char {
                let text = &self.input[content_start..self.position];
                self.advance(c.len_utf8());
                return Token::new(TokenKind::Str, text, start);
            }
            if c == '\\' {
                self.advance(1);
                if let Some(escaped) = self.peek_char() {
                    self.advance(escaped.len_utf8());
                }
                continue;
            }
            if c == '\n' {
                break;
            }
            self.advance(c.len_utf8());
        }

        // Unterminated: hand back everything including the opening quote
        Token::new(TokenKind::Unknown, &self.input[start..self.position], start)
    }

    fn read_number(&mut self) -> Token<'a> {
        let start = self.position;

        let radix_prefix = matches!(
            (self.peek_char(), self.peek_second()),
            (Some('0'), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        );

        if radix_prefix {
            self.advance(2);
            self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        } else {
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek_char() == Some('.') {
                self.advance(1);
                self.advance_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                let sign = matches!(self.peek_second(), Some('+' | '-'));
                let digit_at = if sign { 2 } else { 1 };
                if self
                    .remaining()
                    .chars()
                    .nth(digit_at)
                    .is_some_and(|c| c.is_ascii_digit())
                {
                    self.advance(digit_at);
                    self.advance_while(|c| c.is_ascii_digit() || c == '_');
                }
            }
            // Glue trailing letters on ("2j", "3abc") so the parser rejects
            // the whole thing instead of reading an implicit product.
            self.advance_while(|c| c.is_alphanumeric() || c == '_');
        }

        Token::new(TokenKind::Number, &self.input[start..self.position], start)
    }

    fn read_identifier(&mut self) -> Token<'a> {
        let start = self.position;
        self.advance_while(|c| c.is_alphanumeric() || c == '_');

        let text = &self.input[start..self.position];
        let kind = if is_keyword(text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, text, start)
    }

    fn read_operator(&mut self) -> Token<'a> {
        let start = self.position;
        let rest = self.remaining();

        for (op, kind) in OPERATORS {
            if rest.starts_with(op) {
                self.advance(op.len());
                return Token::new(*kind, &self.input[start..self.position], start);
            }
        }

        // Unknown character - emit it so the parser can report it
        let c = self.peek_char().unwrap_or(' ');
        self.advance(c.len_utf8());
        Token::new(TokenKind::Unknown, &self.input[start..self.position], start)
    }

    fn next_token(&mut self) -> Token<'a> {
        self.skip_trivia();

        let c = match self.peek_char() {
            Some(c) => c,
            None => {
                self.done = true;
                return Token::eof(self.position);
            }
        };

        match c {
            '\'' | '"' => self.read_quoted_string(),
            _ if c.is_ascii_digit() => self.read_number(),
            '.' if self.peek_second().is_some_and(|d| d.is_ascii_digit()) => self.read_number(),
            _ if c.is_alphabetic() || c == '_' => self.read_identifier(),
            _ => self.read_operator(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(token)
    }
}
