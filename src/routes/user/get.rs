use actix_web::{web, HttpResponse};
use anyhow::Context;
use sqlx::SqlitePool;

use super::UserError;
use crate::{
    authentication::Claims,
    domain::{User, UserProfile},
};

#[tracing::instrument(name = "Fetching user profile", skip(claims, pool), fields(user_id = %claims.sub))]
pub async fn get_profile(
    claims: web::ReqData<Claims>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, UserError> {
    let user_id = claims.user_id()?;
    let user = get_user_by_id(&pool, user_id)
        .await
        .context("Failed to fetch user profile.")?
        .ok_or(UserError::NotFound)?;

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

pub(crate) async fn get_user_by_id(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, profile_photo, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
