use chrono::NaiveDate;
use thiserror::Error;

/// Domain errors raised before any external call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DonateError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("event dated {date} falls outside {start}..={end}")]
    OutOfRangeEvent {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("invalid application: {}", .0.join("; "))]
    InvalidApplication(Vec<String>),
    #[error("application not found: {0}")]
    ApplicationNotFound(String),
}

pub type Result<T> = std::result::Result<T, DonateError>;
