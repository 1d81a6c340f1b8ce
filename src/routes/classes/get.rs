use actix_web::{web, HttpResponse};
use anyhow::Context;
use sqlx::SqlitePool;

use super::ClassError;
use crate::{authentication::Claims, domain::Class};

#[tracing::instrument(name = "Listing classes", skip(claims, pool), fields(user_id = %claims.sub))]
pub async fn get_classes(
    claims: web::ReqData<Claims>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ClassError> {
    let user_id = claims.user_id()?;
    let classes = sqlx::query_as::<_, Class>(
        r#"
        SELECT id, name, course, date, start_time, duration, status, user_id, created_at
        FROM classes
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool.get_ref())
    .await
    .context("Failed to list classes.")?;

    Ok(HttpResponse::Ok().json(classes))
}

#[tracing::instrument(name = "Fetching a class", skip(claims, pool), fields(user_id = %claims.sub))]
pub async fn get_class(
    claims: web::ReqData<Claims>,
    class_id: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ClassError> {
    let user_id = claims.user_id()?;
    let class = get_owned_class(&pool, class_id.into_inner(), user_id)
        .await
        .context("Failed to fetch class.")?
        .ok_or(ClassError::NotFound)?;

    Ok(HttpResponse::Ok().json(class))
}

/// The class with `class_id`, if it belongs to `user_id`.
pub(crate) async fn get_owned_class(
    pool: &SqlitePool,
    class_id: i64,
    user_id: i64,
) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(
        r#"
        SELECT id, name, course, date, start_time, duration, status, user_id, created_at
        FROM classes
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(class_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
