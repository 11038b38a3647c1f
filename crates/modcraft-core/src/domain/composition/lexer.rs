//! Tokenizer for the Go subset used by composition-root files.
//!
//! Whitespace is dropped; comments are kept as tokens so spans stay exact
//! and callers can decide whether to ignore them.

use std::ops::Range;

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    String,
    RawString,
    Rune,
    Comment,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.clone()]
    }

    pub fn is_trivia(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    /// Identifiers and numbers need a separator when adjacent.
    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Ident | TokenKind::Number)
    }

    pub fn is_punct(&self, source: &str, punct: char) -> bool {
        self.kind == TokenKind::Punct && source[self.span.clone()].starts_with(punct)
    }

    pub fn is_ident(&self, source: &str, ident: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(source) == ident
    }
}

struct Cursor<'s> {
    source: &'s str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'s> Cursor<'s> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn error(&self, line: usize, column: usize, message: &str) -> DomainError {
        DomainError::SyntaxError {
            location: format!("{line}:{column}"),
            message: message.to_string(),
        }
    }
}

const BOM: char = '\u{feff}';

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Tokenize `source`.
///
/// Fails on unterminated literals or comments and on characters that can
/// never appear in Go source outside a literal.
pub fn tokenize(source: &str) -> Result<Vec<Token>, DomainError> {
    let mut cursor = Cursor {
        source,
        // a leading byte order mark is not part of the source
        pos: if source.starts_with(BOM) { BOM.len_utf8() } else { 0 },
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();

    while let Some(c) = cursor.peek() {
        if c.is_whitespace() {
            cursor.bump();
            continue;
        }

        let start = cursor.pos;
        let (line, column) = (cursor.line, cursor.column);

        let kind = match c {
            '/' if cursor.peek_second() == Some('/') => {
                cursor.eat_while(|c| c != '\n');
                TokenKind::Comment
            }
            '/' if cursor.peek_second() == Some('*') => {
                cursor.bump();
                cursor.bump();
                loop {
                    match cursor.bump() {
                        Some('*') if cursor.peek() == Some('/') => {
                            cursor.bump();
                            break;
                        }
                        Some(_) => {}
                        None => return Err(cursor.error(line, column, "unterminated comment")),
                    }
                }
                TokenKind::Comment
            }
            '"' => {
                cursor.bump();
                loop {
                    match cursor.bump() {
                        Some('\\') => {
                            cursor.bump();
                        }
                        Some('"') => break,
                        Some('\n') | None => {
                            return Err(cursor.error(line, column, "unterminated string literal"));
                        }
                        Some(_) => {}
                    }
                }
                TokenKind::String
            }
            '`' => {
                cursor.bump();
                loop {
                    match cursor.bump() {
                        Some('`') => break,
                        Some(_) => {}
                        None => {
                            return Err(cursor.error(line, column, "unterminated raw string"));
                        }
                    }
                }
                TokenKind::RawString
            }
            '\'' => {
                cursor.bump();
                loop {
                    match cursor.bump() {
                        Some('\\') => {
                            cursor.bump();
                        }
                        Some('\'') => break,
                        Some('\n') | None => {
                            return Err(cursor.error(line, column, "unterminated rune literal"));
                        }
                        Some(_) => {}
                    }
                }
                TokenKind::Rune
            }
            c if c.is_ascii_digit()
                || (c == '.' && cursor.peek_second().is_some_and(|n| n.is_ascii_digit())) =>
            {
                let mut prev = '\0';
                cursor.eat_while(|c| {
                    let keep = c.is_ascii_alphanumeric()
                        || c == '.'
                        || c == '_'
                        || ((c == '+' || c == '-') && matches!(prev, 'e' | 'E' | 'p' | 'P'));
                    prev = c;
                    keep
                });
                TokenKind::Number
            }
            c if is_ident_start(c) => {
                cursor.eat_while(is_ident_continue);
                TokenKind::Ident
            }
            '(' | ')' | '[' | ']' | '{' | '}' | ',' | ';' | '.' | ':' | '=' | '+' | '-'
            | '*' | '/' | '%' | '&' | '|' | '^' | '<' | '>' | '!' | '~' => {
                cursor.bump();
                TokenKind::Punct
            }
            other => {
                return Err(cursor.error(
                    line,
                    column,
                    &format!("unexpected character {other:?}"),
                ));
            }
        };

        tokens.push(Token {
            kind,
            span: start..cursor.pos,
            line,
            column,
        });
    }

    Ok(tokens)
}

/// Normalised text of a token run: comments and layout dropped, a single
/// space kept only between adjacent words.
pub fn canonical_text(source: &str, tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev_word = false;
    for token in tokens.iter().filter(|t| !t.is_trivia()) {
        if prev_word && token.is_word() {
            out.push(' ');
        }
        out.push_str(token.text(source));
        prev_word = token.is_word();
    }
    out
}
