use actix_web::{web, HttpResponse};
use anyhow::Context;
use sqlx::SqlitePool;

use super::AttendanceError;
use crate::domain::Attendance;

/// Open endpoint, like check-in.
#[tracing::instrument(name = "Listing class attendance", skip(pool))]
pub async fn get_class_attendance(
    class_id: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AttendanceError> {
    let attendance = list_class_attendance(&pool, class_id.into_inner())
        .await
        .context("Failed to list class attendance.")?;

    Ok(HttpResponse::Ok().json(attendance))
}

pub(crate) async fn list_class_attendance(
    pool: &SqlitePool,
    class_id: i64,
) -> Result<Vec<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, class_id, student_name, matricula, course, term, biometria, timestamp
        FROM attendance
        WHERE class_id = ?
        ORDER BY timestamp, id
        "#,
    )
    .bind(class_id)
    .fetch_all(pool)
    .await
}
