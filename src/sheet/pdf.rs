//! Minimal PDF 1.4 writer: Helvetica text, lines and DCT (JPEG) images,
//! uncompressed content streams.
use std::fmt::Write as _;

use super::layout::{Align, AttendanceSheet, Element, PAGE_HEIGHT, PAGE_WIDTH};

const PT_PER_MM: f32 = 72.0 / 25.4;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_ID: usize = 3;

fn pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Flips a top-left millimetre y into PDF user space.
fn flip_y(mm: f32) -> f32 {
    pt(PAGE_HEIGHT - mm)
}

struct Document {
    objects: Vec<Vec<u8>>,
}

impl Document {
    fn new() -> Self {
        // ids 1..=3 are fixed
        Self {
            objects: vec![Vec::new(); FONT_ID],
        }
    }

    fn reserve(&mut self) -> usize {
        self.objects.push(Vec::new());
        self.objects.len()
    }

    fn add(&mut self, body: Vec<u8>) -> usize {
        self.objects.push(body);
        self.objects.len()
    }

    fn set(&mut self, id: usize, body: Vec<u8>) {
        self.objects[id - 1] = body;
    }

    fn finish(self) -> Vec<u8> {
        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(self.objects.len());
        for (index, body) in self.objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.objects.len() + 1);
        for offset in offsets {
            let _ = writeln!(xref, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.objects.len() + 1,
            CATALOG_ID,
            xref_offset
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

fn stream(dictionary: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!("<< {} /Length {} >>\nstream\n", dictionary, data.len()).into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(b"\nendstream");
    body
}

/// Escapes a string for a PDF literal in WinAnsiEncoding; characters outside
/// Latin-1 become `?`.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

/// Rough Helvetica advance width in points, good enough for centring.
fn approx_text_width(text: &str, size: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            ' ' => 0.278,
            'i' | 'j' | 'l' | '.' | ',' | ':' | '\'' => 0.25,
            'A'..='Z' => 0.667,
            '0'..='9' => 0.556,
            _ => 0.5,
        })
        .sum();
    em * size
}

pub fn render_pdf(sheet: &AttendanceSheet) -> Vec<u8> {
    let mut doc = Document::new();
    doc.set(
        FONT_ID,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    );

    let mut kids = Vec::with_capacity(sheet.pages.len());
    for page in &sheet.pages {
        let page_id = doc.reserve();
        let mut content = String::new();
        let mut xobjects = String::new();

        for element in &page.elements {
            match element {
                Element::Text {
                    x,
                    y,
                    size,
                    align,
                    text,
                } => {
                    let mut x = pt(*x);
                    if *align == Align::Center {
                        x -= approx_text_width(text, *size) / 2.0;
                    }
                    let _ = writeln!(
                        content,
                        "BT /F1 {:.2} Tf {:.2} {:.2} Td ({}) Tj ET",
                        size,
                        x,
                        flip_y(*y),
                        escape_text(text)
                    );
                }
                Element::Image {
                    x,
                    y,
                    width,
                    height,
                    photo,
                } => {
                    let image_id = doc.add(stream(
                        &format!(
                            "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /{} /BitsPerComponent 8 /Filter /DCTDecode",
                            photo.width(),
                            photo.height(),
                            photo.color_space()
                        ),
                        photo.bytes(),
                    ));
                    let name = format!("Im{}", image_id);
                    let _ = write!(xobjects, " /{} {} 0 R", name, image_id);
                    let _ = writeln!(
                        content,
                        "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /{} Do Q",
                        pt(*width),
                        pt(*height),
                        pt(*x),
                        flip_y(*y + *height),
                        name
                    );
                }
                Element::Line { x1, y1, x2, y2 } => {
                    let _ = writeln!(
                        content,
                        "0.5 w {:.2} {:.2} m {:.2} {:.2} l S",
                        pt(*x1),
                        flip_y(*y1),
                        pt(*x2),
                        flip_y(*y2)
                    );
                }
            }
        }

        let content_id = doc.add(stream("", content.as_bytes()));
        doc.set(
            page_id,
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << /F1 {} 0 R >> /XObject <<{} >> >> /Contents {} 0 R >>",
                PAGES_ID,
                pt(PAGE_WIDTH),
                pt(PAGE_HEIGHT),
                FONT_ID,
                xobjects,
                content_id
            )
            .into_bytes(),
        );
        kids.push(format!("{} 0 R", page_id));
    }

    doc.set(
        PAGES_ID,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            kids.len()
        )
        .into_bytes(),
    );
    doc.set(
        CATALOG_ID,
        format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID).into_bytes(),
    );

    doc.finish()
}
