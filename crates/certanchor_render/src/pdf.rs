//! Minimal single-page PDF emission.
//!
//! The certificate layout is a fixed set of centered text lines plus one
//! URI link annotation covering the verification reference. Emitting the
//! byte format directly keeps the output deterministic for a given input;
//! document aesthetics are not a goal.

use std::fmt::Write as _;

/// A4 page width in points
const PAGE_WIDTH: f32 = 595.0;
/// A4 page height in points
const PAGE_HEIGHT: f32 = 842.0;
/// Minimum left margin in points
const MARGIN: f32 = 36.0;
/// Average glyph width as a fraction of font size, for centering
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// One line of centered text on the certificate page
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Text content
    pub text: String,
    /// Use the bold face
    pub bold: bool,
    /// Font size in points
    pub size: f32,
    /// Baseline height from the page bottom, in points
    pub y: f32,
}

impl TextLine {
    /// Regular-weight line
    #[must_use]
    pub fn regular(text: impl Into<String>, size: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            bold: false,
            size,
            y,
        }
    }

    /// Bold line
    #[must_use]
    pub fn bold(text: impl Into<String>, size: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            bold: true,
            size,
            y,
        }
    }
}

/// A clickable URI region on the page
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// Target URI
    pub uri: String,
    /// Rectangle [llx, lly, urx, ury] in points
    pub rect: [f32; 4],
}

/// Escape a string for a PDF literal string context
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn centered_x(line: &TextLine) -> f32 {
    let approx_width = line.text.chars().count() as f32 * line.size * GLYPH_WIDTH_RATIO;
    ((PAGE_WIDTH - approx_width) / 2.0).max(MARGIN)
}

fn content_stream(lines: &[TextLine]) -> String {
    let mut content = String::new();
    for line in lines {
        let font = if line.bold { "F1" } else { "F2" };
        let x = centered_x(line);
        let _ = write!(
            content,
            "BT /{} {:.1} Tf 1 0 0 1 {:.1} {:.1} Tm ({}) Tj ET\n",
            font,
            line.size,
            x,
            line.y,
            escape(&line.text)
        );
    }
    content
}

/// Emit a complete single-page PDF document.
///
/// Object layout: catalog, page tree, page, bold font, regular font,
/// content stream, link annotation. The cross-reference table carries
/// exact byte offsets, so output length depends only on the input.
#[must_use]
pub fn document(lines: &[TextLine], link: &LinkAnnotation) -> Vec<u8> {
    let content = content_stream(lines);

    let objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
             /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R /Annots [7 0 R] >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
        format!(
            "<< /Type /Annot /Subtype /Link /Rect [{:.1} {:.1} {:.1} {:.1}] /Border [0 0 0] \
             /A << /S /URI /URI ({}) >> >>",
            link.rect[0],
            link.rect[1],
            link.rect[2],
            link.rect[3],
            escape(&link.uri)
        ),
    ];

    let mut out: Vec<u8> = Vec::with_capacity(2048 + content.len());
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = write!(xref, "{offset:010} 00000 n \n");
    }
    out.extend_from_slice(xref.as_bytes());
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}
