use thiserror::Error;

/// Everything that can go wrong between plan text and a finished run:
/// lexical, syntactic, and runtime failures share one error type so a
/// submission fails as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LangError {
    // Lexical
    #[error("unknown character {ch:?} at position {pos}")]
    UnknownWord { ch: char, pos: usize },
    #[error("no more tokens")]
    NoMoreTokens,

    // Syntactic
    #[error("missing token: expected {expected}")]
    MissingToken { expected: String },
    #[error("expected {expected}, found {found:?} at position {pos}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: usize,
    },
    #[error("invalid expression at position {pos}")]
    InvalidExpression { pos: usize },
    #[error("invalid statement at position {pos}")]
    InvalidStatement { pos: usize },
    #[error("invalid direction at position {pos}")]
    InvalidDirection { pos: usize },
    #[error("unknown command {word:?} at position {pos}")]
    UnknownCommand { word: String, pos: usize },
    #[error("plan contains no statements")]
    EmptyPlan,

    // Runtime
    #[error("undefined variable {0:?}")]
    UndefinedVariable(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("operator {0:?} cannot be used here")]
    CannotUseOperator(String),
    #[error("loop did not terminate within the iteration cap")]
    InfiniteLoop,
    /// A world operation failed below the capability boundary (store errors,
    /// missing player records). Carried as text so the language crate stays
    /// independent of the engine.
    #[error("world error: {0}")]
    World(String),
}
