mod delete;
mod end;
mod get;
mod post;
mod sheet;

pub use delete::*;
pub use end::*;
pub use get::*;
pub use post::*;
pub use sheet::*;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::routes::{error_chain_fmt, ErrorResponse};

#[derive(thiserror::Error)]
pub enum ClassError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Class not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ClassError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ClassError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
