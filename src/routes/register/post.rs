use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    authentication::{hash_password, TokenKeys},
    domain::UserProfile,
    routes::{error_chain_fmt, ErrorResponse},
    utils::is_valid_email,
};

#[derive(serde::Deserialize)]
pub struct RegisterData {
    #[serde(default)]
    name: String,
    email: String,
    password: String,
}

#[derive(thiserror::Error)]
pub enum RegisterError {
    #[error("Invalid email format")]
    InvalidEmailFormatError,

    #[error("Password must not be empty")]
    EmptyPasswordError,

    #[error("Email already registered")]
    DuplicateEmailError,

    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for RegisterError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidEmailFormatError
            | Self::EmptyPasswordError
            | Self::DuplicateEmailError => StatusCode::BAD_REQUEST,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

#[derive(Serialize)]
struct RegisterResponse {
    token: String,
    user: UserProfile,
}

#[tracing::instrument(
    name = "Registering a new user",
    skip(register_data, pool, keys),
    fields(user_email = %register_data.email)
)]
pub async fn register(
    register_data: web::Json<RegisterData>,
    pool: web::Data<SqlitePool>,
    keys: web::Data<TokenKeys>,
) -> Result<HttpResponse, RegisterError> {
    let RegisterData {
        name,
        email,
        password,
    } = register_data.into_inner();
    let email = email.trim().to_string();
    let name = name.trim().to_string();

    if !is_valid_email(&email) {
        return Err(RegisterError::InvalidEmailFormatError);
    }
    if password.is_empty() {
        return Err(RegisterError::EmptyPasswordError);
    }
    if email_exists(&pool, &email)
        .await
        .context("Failed to check whether the email is taken.")?
    {
        return Err(RegisterError::DuplicateEmailError);
    }

    let password_hash = hash_password(password).await?;
    let user_id = insert_user(&pool, &name, &email, &password_hash).await?;
    let token = keys.generate_token(user_id, &email)?;

    tracing::info!(user_id, "New user registered");
    Ok(HttpResponse::Ok().json(RegisterResponse {
        token,
        user: UserProfile {
            id: user_id,
            name,
            email,
            profile_photo: None,
        },
    }))
}

pub(crate) async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(email)
        .fetch_one(pool)
        .await
}

#[tracing::instrument(name = "Saving new user in the database", skip_all)]
async fn insert_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64, RegisterError> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, password, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| {
        // lost a race with a concurrent registration
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return RegisterError::DuplicateEmailError;
            }
        }
        RegisterError::UnexpectedError(anyhow::Error::new(e).context("Failed to insert new user."))
    })?;

    Ok(result.last_insert_rowid())
}
