use pest::Parser;

use crate::ast::{SourceFile, Span};

pub mod decls;
pub mod errors;
pub mod types;

pub use errors::{ParseError, SourcePosition};

// Define the parser struct using the grammar file
#[derive(pest_derive::Parser)]
#[grammar = "go.pest"] // Path relative to src/
pub struct GoParser;

pub(crate) fn span_of(pair: &pest::iterators::Pair<Rule>) -> Span {
    let span = pair.as_span();
    Span::new(span.start(), span.end())
}

/// Parse a Go source file into its declaration-level syntax tree.
pub fn parse_source(src: &str) -> Result<SourceFile, ParseError> {
    let mut pairs = GoParser::parse(Rule::source_file, src)?;
    let file = pairs.next().ok_or_else(|| ParseError::Syntax {
        position: SourcePosition { line: 1, column: 1 },
        message: "empty parse result".to_string(),
    })?;
    decls::build_source_file(file, src)
}

/// A syntax tree together with the text its spans point into.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub source: String,
    pub file: SourceFile,
}

impl ParsedFile {
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let source = std::str::from_utf8(bytes)?;
        Self::parse_str(source)
    }

    pub fn parse_str(source: &str) -> Result<Self, ParseError> {
        let file = parse_source(source)?;
        Ok(ParsedFile {
            source: source.to_string(),
            file,
        })
    }

    pub fn text(&self, span: Span) -> &str {
        span.text(&self.source)
    }
}
