use thiserror::Error;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] guidepost_service::error::ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] guidepost_db::error::DbError),

    #[error(transparent)]
    IcalError(#[from] guidepost_ical::error::IcalError),

    #[error(transparent)]
    CoreError(#[from] guidepost_core::error::CoreError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
