use crate::error::LangError;
use crate::token::{is_keyword, Token, TokenKind, OPERATORS};

/// Single-pass token stream with one token of lookahead.
///
/// The lookahead is computed eagerly on construction and after every consume,
/// so lexical errors surface at the position where the bad input starts, not
/// one token late.
#[derive(Debug)]
pub struct Tokenizer {
    chars: Vec<char>,
    cursor: usize,
    lookahead: Token,
}

impl Tokenizer {
    pub fn new(source: &str) -> Result<Self, LangError> {
        let mut tokenizer = Self {
            chars: source.chars().collect(),
            cursor: 0,
            lookahead: Token::eof(0),
        };
        tokenizer.lookahead = tokenizer.next_token()?;
        Ok(tokenizer)
    }

    pub fn has_next(&self) -> bool {
        self.lookahead.kind != TokenKind::Eof
    }

    pub fn peek_value(&self) -> &str {
        &self.lookahead.value
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.lookahead.kind
    }

    /// Source position of the lookahead token.
    pub fn position(&self) -> usize {
        self.lookahead.pos
    }

    /// Take the lookahead token's value and advance. Reading past end of
    /// input is an error.
    pub fn consume(&mut self) -> Result<String, LangError> {
        if self.lookahead.kind == TokenKind::Eof {
            return Err(LangError::NoMoreTokens);
        }
        let value = std::mem::take(&mut self.lookahead.value);
        self.lookahead = self.next_token()?;
        Ok(value)
    }

    /// Consume the lookahead only if its value matches `expected`.
    pub fn consume_expected(&mut self, expected: &str) -> Result<bool, LangError> {
        if self.has_next() && self.lookahead.value == expected {
            self.consume()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume the lookahead only if its kind matches `kind`.
    pub fn consume_kind(&mut self, kind: TokenKind) -> Result<bool, LangError> {
        if self.has_next() && self.lookahead.kind == kind {
            self.consume()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn next_token(&mut self) -> Result<Token, LangError> {
        self.skip_trivia();

        let Some(&c) = self.chars.get(self.cursor) else {
            return Ok(Token::eof(self.cursor));
        };
        let start = self.cursor;

        if c.is_ascii_digit() {
            let run = self.take_while(|c| c.is_ascii_digit());
            return Ok(Token {
                value: run,
                kind: TokenKind::Number,
                pos: start,
            });
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let run = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            let kind = if is_keyword(&run) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            return Ok(Token {
                value: run,
                kind,
                pos: start,
            });
        }

        // Longest match against the operator table.
        let rest: String = self.chars[self.cursor..]
            .iter()
            .take(OPERATORS.iter().map(|op| op.len()).max().unwrap_or(1))
            .collect();
        let mut best: Option<&str> = None;
        for op in OPERATORS {
            if rest.starts_with(op) && best.is_none_or(|b| op.len() > b.len()) {
                best = Some(op);
            }
        }
        if let Some(op) = best {
            self.cursor += op.chars().count();
            return Ok(Token {
                value: op.to_string(),
                kind: TokenKind::Operator,
                pos: start,
            });
        }

        Err(LangError::UnknownWord { ch: c, pos: start })
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.chars.get(self.cursor) {
                Some(c) if c.is_whitespace() => self.cursor += 1,
                Some('#') => {
                    while self
                        .chars
                        .get(self.cursor)
                        .is_some_and(|&c| c != '\n')
                    {
                        self.cursor += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.cursor;
        while self.chars.get(self.cursor).is_some_and(|&c| pred(c)) {
            self.cursor += 1;
        }
        self.chars[start..self.cursor].iter().collect()
    }
}
