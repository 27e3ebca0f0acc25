use thiserror::Error;

/// Calendar parsing and validation errors
#[derive(Error, Debug)]
pub enum IcalError {
    #[error("Parse error: {0}")]
    ParseError(#[from] crate::parse::ParseError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type IcalResult<T> = std::result::Result<T, IcalError>;
