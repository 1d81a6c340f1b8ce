mod delete;
mod get;
mod put;

pub use delete::*;
pub use get::*;
pub use put::*;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::routes::{error_chain_fmt, ErrorResponse};

#[derive(thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Invalid email format")]
    InvalidEmailFormatError,

    #[error("Name must not be empty")]
    EmptyNameError,

    #[error("Email already registered")]
    DuplicateEmailError,

    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UserError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidEmailFormatError | Self::EmptyNameError | Self::DuplicateEmailError => {
                StatusCode::BAD_REQUEST
            }
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
