use thiserror::Error;

/// Errors raised while editing or evaluating a filter list.
///
/// `clause` fields are 1-based, matching the numbering shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Keyword must not be empty")]
    EmptyKeyword,

    #[error("Invalid bracket text '{text}': the {side} may only contain '{allowed}'")]
    InvalidBrackets {
        side: &'static str,
        text: String,
        allowed: char,
    },

    #[error("Unknown logic operator '{0}'. Valid operators are: AND, OR")]
    UnknownLogic(String),

    #[error("There is no clause at index {index} (the list has {len})")]
    NoSuchClause { index: usize, len: usize },

    #[error("Brackets are unbalanced: {open} '(' versus {close} ')'")]
    Unbalanced { open: usize, close: usize },

    #[error("Clause #{clause} closes a group that was never opened")]
    UnexpectedClose { clause: usize },

    #[error("{count} group(s) opened before clause #{clause} are never closed")]
    UnclosedGroup { clause: usize, count: usize },

    #[error("Brackets at clause #{clause} nest deeper than {limit} levels")]
    NestingTooDeep { clause: usize, limit: usize },

    #[error("Clause #{clause} is missing an operand")]
    MissingOperand { clause: usize },

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Expression refers to mask #{0}, which does not exist")]
    UnknownMask(usize),

    #[error("No filter clauses to evaluate")]
    EmptyFilter,
}
