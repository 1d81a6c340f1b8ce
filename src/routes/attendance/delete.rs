use actix_web::{web, HttpResponse};
use anyhow::Context;
use sqlx::SqlitePool;

use super::AttendanceError;
use crate::{authentication::Claims, routes::MessageResponse};

/// Only rows of classes owned by the caller can be removed.
#[tracing::instrument(name = "Deleting attendance", skip(claims, pool), fields(user_id = %claims.sub))]
pub async fn delete_attendance(
    claims: web::ReqData<Claims>,
    attendance_id: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AttendanceError> {
    let user_id = claims.user_id()?;
    let result = sqlx::query(
        r#"
        DELETE FROM attendance
        WHERE id = ?
          AND class_id IN (SELECT id FROM classes WHERE user_id = ?)
        "#,
    )
    .bind(attendance_id.into_inner())
    .bind(user_id)
    .execute(pool.get_ref())
    .await
    .context("Failed to delete attendance.")?;

    if result.rows_affected() == 0 {
        return Err(AttendanceError::NotFound);
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new("Attendance deleted successfully")))
}
