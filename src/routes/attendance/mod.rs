mod delete;
mod get;
mod post;

pub use delete::*;
pub use get::*;
pub use post::*;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::{
    domain::AttendanceValidationError,
    routes::{error_chain_fmt, ErrorResponse},
};

#[derive(thiserror::Error)]
pub enum AttendanceError {
    #[error(transparent)]
    ValidationError(#[from] AttendanceValidationError),

    #[error("Class not found")]
    ClassNotFound,

    #[error("Attendance record not found")]
    NotFound,

    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AttendanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::ClassNotFound | Self::NotFound => StatusCode::NOT_FOUND,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
