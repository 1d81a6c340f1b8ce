use chrono::{DateTime, Local};

use crate::{
    domain::{Attendance, Class},
    photo::Photo,
};

/// A4 portrait, in millimetres.
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

const FIRST_STUDENT_Y: f32 = 90.0;
const PAGE_TOP_Y: f32 = 20.0;
const PAGE_BREAK_Y: f32 = 240.0;
const STUDENT_BLOCK_HEIGHT: f32 = 50.0;
const PHOTO_X: f32 = 140.0;
const PHOTO_SIZE: f32 = 30.0;

pub const PHOTO_UNAVAILABLE: &str = "Photo unavailable";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Align {
    Left,
    Center,
}

/// Positions are in millimetres from the top-left corner of the page.
#[derive(Debug, Clone)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        size: f32,
        align: Align,
        text: String,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        photo: Photo,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
}

#[derive(Debug, Default, Clone)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    fn text(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>) {
        self.elements.push(Element::Text {
            x,
            y,
            size,
            align: Align::Left,
            text: text.into(),
        });
    }
}

#[derive(Debug, Clone)]
pub struct AttendanceSheet {
    pub pages: Vec<Page>,
    /// One per student: either the embedded photo or its placeholder.
    pub photo_blocks: usize,
    pub student_count: usize,
}

impl AttendanceSheet {
    pub fn build(class: &Class, attendance: &[Attendance], generated_at: DateTime<Local>) -> Self {
        let mut pages = Vec::new();
        let mut page = Page::default();
        let mut photo_blocks = 0;

        page.elements.push(Element::Text {
            x: PAGE_WIDTH / 2.0,
            y: 20.0,
            size: 20.0,
            align: Align::Center,
            text: "ATTENDANCE RECORD".to_string(),
        });
        page.text(20.0, 40.0, 12.0, format!("Class: {}", class.name));
        page.text(20.0, 50.0, 12.0, format!("Course: {}", class.course));
        page.text(20.0, 60.0, 12.0, format!("Date: {}", class.date.format("%d/%m/%Y")));
        page.text(20.0, 70.0, 12.0, format!("Start time: {}", class.start_time));

        let mut y = FIRST_STUDENT_Y;
        for (index, student) in attendance.iter().enumerate() {
            if y > PAGE_BREAK_Y {
                pages.push(std::mem::take(&mut page));
                y = PAGE_TOP_Y;
            }

            page.text(20.0, y, 10.0, format!("{}. Name: {}", index + 1, student.student_name));
            page.text(20.0, y + 8.0, 10.0, format!("Matricula: {}", student.matricula));
            page.text(
                20.0,
                y + 16.0,
                10.0,
                format!("Course: {}", student.course.as_deref().unwrap_or("N/A")),
            );
            page.text(
                20.0,
                y + 24.0,
                10.0,
                format!("Term: {}", student.term.as_deref().unwrap_or("N/A")),
            );
            page.text(
                20.0,
                y + 32.0,
                10.0,
                format!(
                    "Time: {}",
                    student.timestamp.with_timezone(&Local).format("%H:%M:%S")
                ),
            );

            match Photo::from_data_url(&student.biometria) {
                Ok(photo) => page.elements.push(Element::Image {
                    x: PHOTO_X,
                    y: y - 5.0,
                    width: PHOTO_SIZE,
                    height: PHOTO_SIZE,
                    photo,
                }),
                Err(e) => {
                    tracing::warn!(attendance_id = student.id, error = %e, "Could not embed photo");
                    page.text(PHOTO_X, y + 15.0, 10.0, PHOTO_UNAVAILABLE);
                }
            }
            photo_blocks += 1;

            page.elements.push(Element::Line {
                x1: 20.0,
                y1: y + 40.0,
                x2: 190.0,
                y2: y + 40.0,
            });
            y += STUDENT_BLOCK_HEIGHT;
        }

        page.text(
            20.0,
            PAGE_HEIGHT - 20.0,
            8.0,
            format!("Total students present: {}", attendance.len()),
        );
        page.text(
            20.0,
            PAGE_HEIGHT - 10.0,
            8.0,
            format!("Generated at: {}", generated_at.format("%d/%m/%Y %H:%M:%S")),
        );
        pages.push(page);

        Self {
            pages,
            photo_blocks,
            student_count: attendance.len(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.elements.iter())
            .filter_map(|e| match e {
                Element::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
    }

    pub fn images(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.elements.iter())
            .filter(|e| matches!(e, Element::Image { .. }))
            .count()
    }
}
