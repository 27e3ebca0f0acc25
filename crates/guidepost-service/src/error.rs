use thiserror::Error;

use guidepost_db::db::enums::BookingStatus;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] guidepost_db::error::DbError),

    #[error(transparent)]
    IcalError(#[from] guidepost_ical::error::IcalError),

    #[error(transparent)]
    CoreError(#[from] guidepost_core::error::CoreError),

    #[error(transparent)]
    PartnerError(#[from] crate::partner::PartnerError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("A sync run is already in progress")]
    SyncInProgress,

    #[error("Diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
