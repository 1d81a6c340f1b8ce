use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse,
};
use anyhow::Context;
use chrono::Local;
use sqlx::SqlitePool;

use super::{get::get_owned_class, ClassError};
use crate::{
    authentication::Claims,
    routes::attendance::list_class_attendance,
    sheet::{render_pdf, sheet_filename, AttendanceSheet},
};

#[tracing::instrument(name = "Exporting attendance sheet", skip(claims, pool), fields(user_id = %claims.sub))]
pub async fn export_attendance_sheet(
    claims: web::ReqData<Claims>,
    class_id: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ClassError> {
    let user_id = claims.user_id()?;
    let class = get_owned_class(&pool, class_id.into_inner(), user_id)
        .await
        .context("Failed to fetch class.")?
        .ok_or(ClassError::NotFound)?;
    let attendance = list_class_attendance(&pool, class.id)
        .await
        .context("Failed to fetch class attendance.")?;

    let sheet = AttendanceSheet::build(&class, &attendance, Local::now());
    let bytes = render_pdf(&sheet);
    tracing::info!(
        class_id = class.id,
        students = sheet.student_count,
        pages = sheet.pages.len(),
        "Attendance sheet rendered"
    );

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(sheet_filename(&class))],
        })
        .body(bytes))
}
