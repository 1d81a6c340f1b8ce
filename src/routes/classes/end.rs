use actix_web::{web, HttpResponse};
use anyhow::Context;
use sqlx::SqlitePool;

use super::ClassError;
use crate::{authentication::Claims, domain::ClassStatus, routes::MessageResponse};

/// Flips the class to `ended`. Ending an ended class is accepted and leaves
/// it ended.
#[tracing::instrument(name = "Ending a class", skip(claims, pool), fields(user_id = %claims.sub))]
pub async fn end_class(
    claims: web::ReqData<Claims>,
    class_id: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ClassError> {
    let user_id = claims.user_id()?;
    let result = sqlx::query("UPDATE classes SET status = ? WHERE id = ? AND user_id = ?")
        .bind(ClassStatus::Ended)
        .bind(class_id.into_inner())
        .bind(user_id)
        .execute(pool.get_ref())
        .await
        .context("Failed to end class.")?;

    if result.rows_affected() == 0 {
        return Err(ClassError::NotFound);
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new("Class ended successfully")))
}
