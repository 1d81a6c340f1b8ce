use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ClassStatus {
    Active,
    Ended,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub course: String,
    pub date: NaiveDate,
    #[serde(rename = "startTime")]
    pub start_time: String,
    pub duration: i64,
    pub status: ClassStatus,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A validated class, ready to be inserted.
#[derive(Debug, PartialEq)]
pub struct NewClass {
    pub name: String,
    pub course: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration: i64,
}

impl NewClass {
    pub fn parse(
        name: &str,
        course: &str,
        date: &str,
        start_time: &str,
        duration: i64,
    ) -> Result<Self, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Class name is required".to_string());
        }
        let course = course.trim();
        if course.is_empty() {
            return Err("Course is required".to_string());
        }
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| format!("Invalid date `{}`, expected YYYY-MM-DD", date))?;
        let start_time = parse_start_time(start_time)
            .ok_or_else(|| format!("Invalid start time `{}`, expected HH:MM", start_time))?;
        if duration <= 0 {
            return Err("Duration must be a positive number of minutes".to_string());
        }

        Ok(Self {
            name: name.to_string(),
            course: course.to_string(),
            date,
            start_time: start_time.format("%H:%M").to_string(),
            duration,
        })
    }
}

fn parse_start_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}
