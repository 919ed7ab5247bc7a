use crate::domain::{LeadStatus, TagName};
use crate::rules::DueSelector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    /// Case-insensitive substring of name or email.
    Text(String),
    Tag(TagName),
    Status(LeadStatus),
    Source(String),
    Country(String),
    City(String),
    Due(DueSelector),
    And(Vec<FilterExpr>),
}

pub type LeadFilter = FilterExpr;
