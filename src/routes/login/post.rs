use actix_web::{
    web::{self, Json},
    HttpResponse, ResponseError,
};
use anyhow::Context;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    authentication::{validate_credentials, AuthError, Credentials, TokenKeys},
    domain::{User, UserProfile},
    routes::{error_chain_fmt, ErrorResponse},
    utils::is_valid_email,
};

#[derive(serde::Deserialize)]
pub struct LoginData {
    email: String,
    password: String,
}

#[derive(thiserror::Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    AuthError(#[source] anyhow::Error),

    #[error("Invalid email format")]
    InvalidEmailFormatError,

    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for LoginError {
    fn error_response(&self) -> HttpResponse {
        let response = ErrorResponse::new(self.to_string());
        match self {
            LoginError::InvalidEmailFormatError | LoginError::AuthError(_) => {
                HttpResponse::BadRequest().json(response)
            }
            LoginError::UnexpectedError(_) => HttpResponse::InternalServerError().json(response),
        }
    }
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    user: UserProfile,
}

#[tracing::instrument(
    name = "Logging in",
    skip(login_data, pool, keys),
    fields(user_email = %login_data.email, user_id = tracing::field::Empty)
)]
pub async fn login(
    login_data: Json<LoginData>,
    pool: web::Data<SqlitePool>,
    keys: web::Data<TokenKeys>,
) -> Result<HttpResponse, LoginError> {
    let LoginData { email, password } = login_data.into_inner();
    let email = email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(LoginError::InvalidEmailFormatError);
    }

    let user_id = validate_credentials(Credentials { email, password }, &pool)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials(_) => LoginError::AuthError(e.into()),
            AuthError::UnexpectedError(_) => LoginError::UnexpectedError(e.into()),
        })?;
    tracing::Span::current().record("user_id", user_id);

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool.get_ref())
        .await
        .context("Failed to load the authenticated user.")?;

    let token = keys.generate_token(user.id, &user.email)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: user.into(),
    }))
}
