//! Minimal text-only PDF writer and reader
//!
//! Output is a PDF 1.4 file with one Type1 font (Helvetica) and one content
//! stream per page. Layout is a plain line flow: no styling survives.

use super::document::plain_text;
use super::Serializer;
use crate::conversion::ConversionOptions;
use crate::error::SerializeResult;
use crate::model::Intermediate;
use once_cell::sync::Lazy;
use regex::Regex;

pub const LINES_PER_PAGE: usize = 46;
pub const WRAP_WIDTH: usize = 90;

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const MARGIN_LEFT: u32 = 50;
const FIRST_BASELINE: u32 = 742;
const FONT_SIZE: u32 = 10;
const LEADING: u32 = 14;

static RE_SHOW_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(((?:\\.|[^\\)])*)\)\s*Tj").expect("Invalid regex"));

/// Wrap one line at `width` characters, preferring the last space
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= width {
        return vec![line.to_string()];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    while chars.len() - start > width {
        let window = &chars[start..start + width];
        let cut = match window.iter().rposition(|c| *c == ' ') {
            Some(space) if space > 0 => start + space,
            _ => start + width,
        };
        pieces.push(chars[start..cut].iter().collect::<String>().trim_end().to_string());
        start = cut;
        while start < chars.len() && chars[start] == ' ' {
            start += 1;
        }
    }
    if start < chars.len() {
        pieces.push(chars[start..].iter().collect());
    }
    pieces
}

/// Escape a line for a PDF literal string; non-ASCII becomes `?`
fn pdf_string(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            '\t' => out.push_str("    "),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn page_stream(lines: &[String]) -> String {
    let mut stream = format!(
        "BT\n/F1 {FONT_SIZE} Tf\n{LEADING} TL\n{MARGIN_LEFT} {FIRST_BASELINE} Td\n"
    );
    for line in lines {
        stream.push_str(&format!("({}) Tj T*\n", pdf_string(line)));
    }
    stream.push_str("ET");
    stream
}

/// Lay `text` out into a complete PDF document
pub fn render_pdf(text: &str) -> String {
    let lines: Vec<String> = text
        .replace("\r\n", "\n")
        .split('\n')
        .flat_map(|line| wrap_line(line, WRAP_WIDTH))
        .collect();
    // Splitting always yields at least one (possibly empty) line
    let pages: Vec<&[String]> = lines.chunks(LINES_PER_PAGE).collect();

    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            id + 1
        ));
        let stream = page_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", index + 1, body));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    pdf
}

/// Text shown by `Tj` operators, one line per operator
///
/// Returns `None` when the content has no text operators, as for anything
/// this module did not write.
pub fn extract_text(content: &str) -> Option<String> {
    let lines: Vec<String> = RE_SHOW_TEXT
        .captures_iter(content)
        .map(|caps| unescape_pdf_string(&caps[1]))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn unescape_pdf_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// PDF output holding the plain text of the source
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfSerializer;

impl Serializer for PdfSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        let text = plain_text(value, options)?;
        Ok(render_pdf(&text))
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}
