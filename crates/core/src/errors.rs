use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid group id `{0}`")]
    InvalidGroupId(String),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Failure kinds surfaced by the quote command family.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("malformed quote command")]
    MalformedCommand,
    #[error("no quotes found")]
    NotFound,
    #[error("{0}")]
    Persistence(String),
    #[error("only the person who wrote the quote can delete it")]
    Unauthorized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Warn,
    Error,
}

impl QuoteError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Persistence(_) => Severity::Error,
            Self::MalformedCommand => Severity::Warn,
            Self::NotFound | Self::Unauthorized => Severity::Debug,
        }
    }
}

impl From<DomainError> for QuoteError {
    fn from(value: DomainError) -> Self {
        Self::Persistence(value.to_string())
    }
}
