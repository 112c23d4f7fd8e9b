use crate::error::SourceLoc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier(String),
    Integer(String),
    StringLit(String),
    /// A maximal run of operator characters, or the two-character `->`.
    Operator(String),
    Keyword(String),
    /// One of `( ) ; , .`
    Symbol(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: SourceLoc,
}

impl Token {
    /// The raw text this token was scanned from, for error messages and for
    /// the parser's keyword/operator dispatch.
    pub fn text(&self) -> &str {
        match &self.kind {
            TokenKind::Identifier(s) | TokenKind::Integer(s) | TokenKind::StringLit(s) => s,
            TokenKind::Operator(s) | TokenKind::Keyword(s) => s,
            TokenKind::Symbol(c) => match c {
                '(' => "(",
                ')' => ")",
                ';' => ";",
                ',' => ",",
                '.' => ".",
                _ => unreachable!("symbol tokens are only ( ) ; , ."),
            },
            TokenKind::Eof => "EOF",
        }
    }
}
