use anyhow::Error;
use leadline_config::ConfigError;
use leadline_core::filter::FilterParseError;
use leadline_core::time::TimeParseError;
use leadline_core::CoreError;
use leadline_store::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

/// Process exit statuses; scripts rely on these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    Failure = 1,
    NotFound = 2,
    InvalidInput = 3,
}

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

/// `--verbose` prints the whole context chain.
pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {err:#}");
    } else {
        eprintln!("error: {err}");
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(classify(err) as u8)
}

/// First recognizable cause in the chain decides.
fn classify(err: &Error) -> Exit {
    err.chain()
        .find_map(|cause| {
            if let Some(cli) = cause.downcast_ref::<CliError>() {
                return Some(match cli {
                    CliError::InvalidInput(_) => Exit::InvalidInput,
                    CliError::NotFound(_) => Exit::NotFound,
                });
            }
            if let Some(store) = cause.downcast_ref::<StoreError>() {
                return Some(match store.kind() {
                    StoreErrorKind::NotFound => Exit::NotFound,
                    StoreErrorKind::InvalidInput => Exit::InvalidInput,
                    StoreErrorKind::Corrupt
                    | StoreErrorKind::Environment
                    | StoreErrorKind::Database => Exit::Failure,
                });
            }
            if let Some(config) = cause.downcast_ref::<ConfigError>() {
                return Some(match config {
                    ConfigError::MissingHomeDir => Exit::Failure,
                    _ => Exit::InvalidInput,
                });
            }
            let bad_input = cause.is::<CoreError>()
                || cause.is::<FilterParseError>()
                || cause.is::<TimeParseError>();
            bad_input.then_some(Exit::InvalidInput)
        })
        .unwrap_or(Exit::Failure)
}
