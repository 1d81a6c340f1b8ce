use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::photo::Photo;
use crate::utils::is_blank;

/// One student check-in. Wire names follow the check-in form
/// (`nome`, `curso`, `periodo`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: i64,
    pub class_id: i64,
    #[serde(rename = "nome")]
    pub student_name: String,
    pub matricula: String,
    #[serde(rename = "curso")]
    pub course: Option<String>,
    #[serde(rename = "periodo")]
    pub term: Option<String>,
    pub biometria: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AttendanceValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("biometria must be a base64-encoded JPEG: {0}")]
    InvalidPhoto(String),
}

/// A validated check-in, ready to be inserted.
#[derive(Debug)]
pub struct NewAttendance {
    pub class_id: i64,
    pub student_name: String,
    pub matricula: String,
    pub course: Option<String>,
    pub term: Option<String>,
    pub biometria: String,
}

impl NewAttendance {
    pub fn parse(
        class_id: i64,
        student_name: Option<&str>,
        matricula: Option<&str>,
        course: Option<&str>,
        term: Option<&str>,
        biometria: Option<&str>,
    ) -> Result<Self, AttendanceValidationError> {
        if is_blank(student_name) {
            return Err(AttendanceValidationError::MissingField("nome"));
        }
        if is_blank(matricula) {
            return Err(AttendanceValidationError::MissingField("matricula"));
        }
        if is_blank(biometria) {
            return Err(AttendanceValidationError::MissingField("biometria"));
        }
        let biometria = biometria.unwrap_or_default().trim();
        Photo::from_data_url(biometria)
            .map_err(|e| AttendanceValidationError::InvalidPhoto(e.to_string()))?;

        Ok(Self {
            class_id,
            student_name: student_name.unwrap_or_default().trim().to_string(),
            matricula: matricula.unwrap_or_default().trim().to_string(),
            course: optional(course),
            term: optional(term),
            biometria: biometria.to_string(),
        })
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
