use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::{get::get_user_by_id, UserError};
use crate::{
    authentication::{hash_password, Claims},
    domain::UserProfile,
    utils::is_valid_email,
};

#[derive(Deserialize)]
pub struct ProfileUpdate {
    name: String,
    email: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    profile_photo: Option<String>,
}

#[derive(Serialize)]
struct ProfileUpdated {
    message: &'static str,
    user: UserProfile,
}

#[tracing::instrument(name = "Updating user profile", skip(claims, update, pool), fields(user_id = %claims.sub))]
pub async fn update_profile(
    claims: web::ReqData<Claims>,
    update: web::Json<ProfileUpdate>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, UserError> {
    let user_id = claims.user_id()?;
    let ProfileUpdate {
        name,
        email,
        password,
        profile_photo,
    } = update.into_inner();
    let name = name.trim().to_string();
    let email = email.trim().to_string();

    if name.is_empty() {
        return Err(UserError::EmptyNameError);
    }
    if !is_valid_email(&email) {
        return Err(UserError::InvalidEmailFormatError);
    }
    if email_taken_by_other(&pool, &email, user_id)
        .await
        .context("Failed to check whether the email is taken.")?
    {
        return Err(UserError::DuplicateEmailError);
    }

    let password_hash = match password.filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(password).await?),
        None => None,
    };

    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = ?, email = ?, profile_photo = ?, password = COALESCE(?, password)
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&profile_photo)
    .bind(&password_hash)
    .bind(user_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        // a concurrent update claimed the email first
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return UserError::DuplicateEmailError;
            }
        }
        UserError::UnexpectedError(anyhow::Error::new(e).context("Failed to update user profile."))
    })?;

    if result.rows_affected() == 0 {
        return Err(UserError::NotFound);
    }

    let user = get_user_by_id(&pool, user_id)
        .await
        .context("Failed to reload user profile.")?
        .ok_or(UserError::NotFound)?;

    Ok(HttpResponse::Ok().json(ProfileUpdated {
        message: "Profile updated successfully",
        user: user.into(),
    }))
}

async fn email_taken_by_other(
    pool: &SqlitePool,
    email: &str,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND id != ?)")
        .bind(email)
        .bind(user_id)
        .fetch_one(pool)
        .await
}
