use actix_web::{web, HttpResponse};
use anyhow::Context;
use sqlx::SqlitePool;

use super::UserError;
use crate::{authentication::Claims, routes::MessageResponse};

/// Removes the account together with every class it owns and their
/// attendance, in one transaction.
#[tracing::instrument(name = "Deleting user account", skip(claims, pool), fields(user_id = %claims.sub))]
pub async fn delete_account(
    claims: web::ReqData<Claims>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, UserError> {
    let user_id = claims.user_id()?;
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a connection to delete the account.")?;

    let attendance = sqlx::query(
        "DELETE FROM attendance WHERE class_id IN (SELECT id FROM classes WHERE user_id = ?)",
    )
    .bind(user_id)
    .execute(&mut *transaction)
    .await
    .context("Failed to delete attendance of the user's classes.")?;

    let classes = sqlx::query("DELETE FROM classes WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to delete the user's classes.")?;

    let user = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to delete the user.")?;

    if user.rows_affected() == 0 {
        transaction
            .rollback()
            .await
            .context("Failed to roll back account deletion.")?;
        return Err(UserError::NotFound);
    }

    transaction
        .commit()
        .await
        .context("Failed to commit account deletion.")?;

    tracing::info!(
        classes = classes.rows_affected(),
        attendance = attendance.rows_affected(),
        "Account deleted"
    );
    Ok(HttpResponse::Ok().json(MessageResponse::new("Account deleted successfully")))
}
