//! Hand-written scanner over RPAL source text.
//!
//! Mirrors the shape of the original course lexer (character classes,
//! maximal-munch operator runs, `//` line comments) but fixes the
//! `ESCAPE_SEQUENCES` table so string literals actually use it, and reports
//! errors through [`RpalError`] instead of raising on the caller.

use crate::error::{RpalError, SourceLoc};
use crate::token::{Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "let", "in", "fn", "where", "aug", "rec", "and", "within", "or", "not", "gr", "ge", "ls", "le", "eq", "ne",
    "true", "false", "nil", "dummy",
];

const OPERATOR_CHARS: &str = "+-*/=<>|&@:~$!#%^_?";

pub fn lex(source: &str) -> Result<Vec<Token>, RpalError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: Vec<char>,
    source: &'a str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { chars: source.chars().collect(), source, pos: 0, line: 1, col: 1 }
    }

    fn loc(&self) -> SourceLoc {
        SourceLoc { line: self.line, column: self.col }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn run(mut self) -> Result<Vec<Token>, RpalError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let loc = self.loc();
            let Some(c) = self.peek() else {
                tokens.push(Token { kind: TokenKind::Eof, loc });
                return Ok(tokens);
            };
            let kind = if c.is_alphabetic() {
                self.scan_identifier_or_keyword()
            } else if c.is_ascii_digit() {
                self.scan_integer()
            } else if c == '\'' {
                self.scan_string(loc)?
            } else if matches!(c, '(' | ')' | ';' | ',' | '.') {
                self.advance();
                TokenKind::Symbol(c)
            } else if OPERATOR_CHARS.contains(c) {
                self.scan_operator()
            } else {
                return Err(RpalError::Lex { loc, message: format!("unexpected character '{c}'") });
            };
            tokens.push(Token { kind, loc });
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if KEYWORDS.contains(&text.as_str()) {
            TokenKind::Keyword(text)
        } else {
            TokenKind::Identifier(text)
        }
    }

    fn scan_integer(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        TokenKind::Integer(self.chars[start..self.pos].iter().collect())
    }

    fn scan_string(&mut self, start_loc: SourceLoc) -> Result<TokenKind, RpalError> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(RpalError::Lex { loc: start_loc, message: "unterminated string literal".to_owned() });
                }
                Some('\'') => break,
                Some('\\') => {
                    let escaped = self.advance().ok_or_else(|| RpalError::Lex {
                        loc: start_loc,
                        message: "unterminated escape sequence in string literal".to_owned(),
                    })?;
                    value.push(match escaped {
                        't' => '\t',
                        'n' => '\n',
                        '\\' => '\\',
                        '\'' => '\'',
                        other => {
                            return Err(RpalError::Lex {
                                loc: start_loc,
                                message: format!("unknown escape sequence '\\{other}'"),
                            });
                        }
                    });
                }
                Some(c) => value.push(c),
            }
        }
        Ok(TokenKind::StringLit(value))
    }

    fn scan_operator(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if OPERATOR_CHARS.contains(c)) {
            self.advance();
        }
        TokenKind::Operator(self.chars[start..self.pos].iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            kinds("let f = x in f"),
            vec![
                TokenKind::Keyword("let".into()),
                TokenKind::Identifier("f".into()),
                TokenKind::Operator("=".into()),
                TokenKind::Identifier("x".into()),
                TokenKind::Keyword("in".into()),
                TokenKind::Identifier("f".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_arrow_as_one_operator_token() {
        assert_eq!(
            kinds("n ls 0 -> -n | n"),
            vec![
                TokenKind::Identifier("n".into()),
                TokenKind::Keyword("ls".into()),
                TokenKind::Integer("0".into()),
                TokenKind::Operator("->".into()),
                TokenKind::Operator("-".into()),
                TokenKind::Identifier("n".into()),
                TokenKind::Operator("|".into()),
                TokenKind::Identifier("n".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literal_decodes_escapes() {
        assert_eq!(kinds("'a\\tb'"), vec![TokenKind::StringLit("a\tb".into()), TokenKind::Eof]);
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(kinds("x // trailing comment\n"), vec![TokenKind::Identifier("x".into()), TokenKind::Eof]);
    }

    #[test]
    fn rejects_unknown_character() {
        let err = lex("x \u{0}").unwrap_err();
        assert!(matches!(err, RpalError::Lex { .. }));
    }
}
