#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Identifier,
    Keyword,
    Operator,
    Eof,
}

/// A positioned token. `pos` is the character offset of the token's first
/// character in the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
    pub pos: usize,
}

impl Token {
    pub fn eof(pos: usize) -> Self {
        Self {
            value: String::new(),
            kind: TokenKind::Eof,
            pos,
        }
    }
}

/// Reserved words of the language. Special value names (`rows`, `budget`, …)
/// are deliberately absent: they lex as ordinary identifiers and the parser
/// resolves them by name.
pub const KEYWORDS: &[&str] = &[
    "if",
    "then",
    "else",
    "while",
    "done",
    "relocate",
    "move",
    "invest",
    "collect",
    "shoot",
    "opponent",
    "nearby",
    "up",
    "down",
    "upleft",
    "upright",
    "downleft",
    "downright",
];

/// Operator and punctuation table, matched longest-first.
pub const OPERATORS: &[&str] = &["+", "-", "*", "/", "%", "^", "=", "(", ")", "{", "}"];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}
