pub mod chat;
pub mod domain;
pub mod dto;
pub mod error;
pub mod filter;
pub mod intake;
pub mod report;
pub mod rules;
pub mod time;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use filter::{parse_filter, FilterExpr, FilterParseError, LeadFilter};
pub use intake::{IntakeProfile, IntakeRequest};
pub use rules::*;
