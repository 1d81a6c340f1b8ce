use actix_web::{web, HttpResponse};
use anyhow::Context;
use sqlx::SqlitePool;

use super::ClassError;
use crate::{authentication::Claims, routes::MessageResponse};

/// Deletes the class and its attendance rows in one transaction.
#[tracing::instrument(name = "Deleting a class", skip(claims, pool), fields(user_id = %claims.sub))]
pub async fn delete_class(
    claims: web::ReqData<Claims>,
    class_id: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ClassError> {
    let user_id = claims.user_id()?;
    let class_id = class_id.into_inner();
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a connection to delete the class.")?;

    let owned = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM classes WHERE id = ? AND user_id = ?)",
    )
    .bind(class_id)
    .bind(user_id)
    .fetch_one(&mut *transaction)
    .await
    .context("Failed to check class ownership.")?;
    if !owned {
        return Err(ClassError::NotFound);
    }

    let attendance = sqlx::query("DELETE FROM attendance WHERE class_id = ?")
        .bind(class_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to delete attendance of the class.")?;

    sqlx::query("DELETE FROM classes WHERE id = ? AND user_id = ?")
        .bind(class_id)
        .bind(user_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to delete the class.")?;

    transaction
        .commit()
        .await
        .context("Failed to commit class deletion.")?;

    tracing::info!(class_id, attendance = attendance.rows_affected(), "Class deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Class deleted successfully")))
}
