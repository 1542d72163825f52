use shared_models::error::AppError;
use thiserror::Error;

pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load doctors. Please try again later.";

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to fetch doctors: {0}")]
    Fetch(String),

    #[error("Doctor not found: {0}")]
    NotFound(String),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Fetch(_) => AppError::ExternalService(LOAD_FAILURE_MESSAGE.to_string()),
            DirectoryError::NotFound(_) => AppError::NotFound("Doctor not found".to_string()),
        }
    }
}
