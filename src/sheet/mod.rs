//! Attendance sheet ("ata") export: a page layout built from a class and its
//! check-ins, rendered to a PDF.
mod layout;
mod pdf;

pub use layout::*;
pub use pdf::render_pdf;

use crate::domain::Class;

/// `ata-<class name>-<dd-mm-YYYY>.pdf`, restricted to filename-safe
/// characters.
pub fn sheet_filename(class: &Class) -> String {
    let name: String = class
        .name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("ata-{}-{}.pdf", name, class.date.format("%d-%m-%Y"))
}
