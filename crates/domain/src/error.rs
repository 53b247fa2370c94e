use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("record id must be positive, got {0}")]
    InvalidRecordId(i64),
    #[error("{0} must not be blank")]
    BlankField(&'static str),
    #[error("invalid data uri: {0}")]
    InvalidDataUri(String),
    #[error("style strength must be within 0.0..=1.0, got {0}")]
    StrengthOutOfRange(String),
}
