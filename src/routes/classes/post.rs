use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use super::ClassError;
use crate::{
    authentication::Claims,
    domain::{ClassStatus, NewClass},
    routes::CreatedResponse,
    utils::deserialize_int_or_string,
};

#[derive(Deserialize)]
pub struct ClassData {
    name: String,
    course: String,
    date: String,
    #[serde(rename = "startTime")]
    start_time: String,
    #[serde(deserialize_with = "deserialize_int_or_string")]
    duration: i64,
}

#[tracing::instrument(name = "Creating a class", skip(claims, class_data, pool), fields(user_id = %claims.sub))]
pub async fn create_class(
    claims: web::ReqData<Claims>,
    class_data: web::Json<ClassData>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ClassError> {
    let user_id = claims.user_id()?;
    let new_class = NewClass::parse(
        &class_data.name,
        &class_data.course,
        &class_data.date,
        &class_data.start_time,
        class_data.duration,
    )
    .map_err(ClassError::ValidationError)?;

    let class_id = insert_class(&pool, &new_class, user_id).await?;

    Ok(HttpResponse::Created().json(CreatedResponse {
        id: class_id,
        message: "Class created successfully".to_string(),
    }))
}

#[tracing::instrument(name = "Saving new class in the database", skip(pool, class))]
async fn insert_class(
    pool: &SqlitePool,
    class: &NewClass,
    user_id: i64,
) -> Result<i64, ClassError> {
    let result = sqlx::query(
        r#"
        INSERT INTO classes (name, course, date, start_time, duration, status, user_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&class.name)
    .bind(&class.course)
    .bind(class.date)
    .bind(&class.start_time)
    .bind(class.duration)
    .bind(ClassStatus::Active)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| {
        // the token outlived its account
        if let sqlx::Error::Database(db) = &e {
            if db.is_foreign_key_violation() {
                return ClassError::UserNotFound;
            }
        }
        ClassError::UnexpectedError(anyhow::Error::new(e).context("Failed to insert new class."))
    })?;

    Ok(result.last_insert_rowid())
}
