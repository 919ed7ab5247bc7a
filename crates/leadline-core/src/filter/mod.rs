mod ast;
mod parser;

use thiserror::Error;

pub use ast::{FilterExpr, LeadFilter};
pub use parser::parse_filter;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("empty tag token")]
    EmptyTag,
    #[error("invalid tag: {0}")]
    InvalidTag(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    #[error("invalid due selector: {0}")]
    InvalidDueSelector(String),
    #[error("empty value for {0}:")]
    EmptyValue(String),
    #[error("unterminated quote")]
    UnterminatedQuote,
}
