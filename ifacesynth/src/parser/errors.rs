use pest::iterators::Pair;
use thiserror::Error;

use super::Rule;

/// Line and column of a parse problem, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("source is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("{position}: {message}")]
    Syntax {
        position: SourcePosition,
        message: String,
    },

    #[error("{position}: expected {expected}, found {found}")]
    UnexpectedRule {
        expected: String,
        found: String,
        position: SourcePosition,
    },

    #[error("{position}: missing {token}")]
    MissingToken {
        token: String,
        position: SourcePosition,
    },
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let (line, column) = match err.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        ParseError::Syntax {
            position: SourcePosition { line, column },
            message: err.variant.message().into_owned(),
        }
    }
}

pub(super) fn pair_position(pair: &Pair<Rule>) -> SourcePosition {
    let (line, column) = pair.as_span().start_pos().line_col();
    SourcePosition { line, column }
}

pub(super) fn missing_token_error(token: &str, pair: &Pair<Rule>) -> ParseError {
    ParseError::MissingToken {
        token: token.to_string(),
        position: pair_position(pair),
    }
}

pub(super) fn unexpected_rule_error(expected: &str, pair: &Pair<Rule>) -> ParseError {
    ParseError::UnexpectedRule {
        expected: expected.to_string(),
        found: format!("{:?}", pair.as_rule()),
        position: pair_position(pair),
    }
}
