use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use super::AttendanceError;
use crate::{
    domain::NewAttendance, routes::CreatedResponse, utils::deserialize_int_or_string,
};

/// Check-in payload. Every field is optional here so that a missing one is
/// reported by name instead of as a deserialisation failure.
#[derive(Deserialize)]
pub struct AttendanceData {
    #[serde(rename = "classId", deserialize_with = "deserialize_int_or_string")]
    class_id: i64,
    nome: Option<String>,
    matricula: Option<String>,
    curso: Option<String>,
    periodo: Option<String>,
    biometria: Option<String>,
}

/// Open endpoint: students check in without a teacher session.
#[tracing::instrument(
    name = "Registering attendance",
    skip(attendance_data, pool),
    fields(class_id = attendance_data.class_id)
)]
pub async fn register_attendance(
    attendance_data: web::Json<AttendanceData>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AttendanceError> {
    let data = attendance_data.into_inner();
    let attendance = NewAttendance::parse(
        data.class_id,
        data.nome.as_deref(),
        data.matricula.as_deref(),
        data.curso.as_deref(),
        data.periodo.as_deref(),
        data.biometria.as_deref(),
    )?;

    if !class_exists(&pool, attendance.class_id)
        .await
        .context("Failed to look up the class.")?
    {
        return Err(AttendanceError::ClassNotFound);
    }

    let id = insert_attendance(&pool, &attendance)
        .await
        .context("Failed to insert attendance.")?;

    tracing::info!(attendance_id = id, "Attendance registered");
    Ok(HttpResponse::Created().json(CreatedResponse {
        id,
        message: "Attendance registered successfully".to_string(),
    }))
}

async fn class_exists(pool: &SqlitePool, class_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM classes WHERE id = ?)")
        .bind(class_id)
        .fetch_one(pool)
        .await
}

async fn insert_attendance(
    pool: &SqlitePool,
    attendance: &NewAttendance,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (class_id, student_name, matricula, course, term, biometria, timestamp)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(attendance.class_id)
    .bind(&attendance.student_name)
    .bind(&attendance.matricula)
    .bind(&attendance.course)
    .bind(&attendance.term)
    .bind(&attendance.biometria)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}
