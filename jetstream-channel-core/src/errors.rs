use thiserror::Error;

pub type Result<T> = std::result::Result<T, DurationParseError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("duration cannot be empty")]
    Empty,

    #[error("invalid number in duration: {0:?}")]
    InvalidNumber(String),

    #[error("missing unit in duration: {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {0:?} in duration")]
    UnknownUnit(String),

    #[error("duration out of range: {0:?}")]
    Overflow(String),
}
