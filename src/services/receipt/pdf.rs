//! Just enough PDF to print a fixed-layout receipt: base-14 Helvetica text,
//! rules and filled boxes, positioned in millimetres from the top-left corner.

use std::fmt::Write as _;

const MM_TO_PT: f64 = 72.0 / 25.4;

/// Helvetica advance widths for `' '..='~'`, in thousandths of the font size.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for anything outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    /// Glyph advance in thousandths of the font size.
    fn glyph_width(&self, c: char) -> u16 {
        let table = match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        match c {
            ' '..='~' => table[c as usize - 32],
            _ => FALLBACK_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

pub struct PdfDocument {
    width_mm: f64,
    height_mm: f64,
    pages: Vec<String>,
    current: String,
    font: Font,
    font_size: f64,
    text_gray: f64,
}

impl PdfDocument {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            pages: Vec::new(),
            current: String::new(),
            font: Font::Regular,
            font_size: 10.0,
            text_gray: 0.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.width_mm
    }

    pub fn set_font(&mut self, font: Font, size_pt: f64) {
        self.font = font;
        self.font_size = size_pt;
    }

    /// 0.0 is black, 1.0 white.
    pub fn set_text_gray(&mut self, level: f64) {
        self.text_gray = level.clamp(0.0, 1.0);
    }

    /// Rendered width of `text` in millimetres at the current font.
    pub fn text_width(&self, text: &str) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(self.font.glyph_width(c))).sum();
        f64::from(units) / 1000.0 * self.font_size / MM_TO_PT
    }

    fn x_pt(x_mm: f64) -> f64 {
        x_mm * MM_TO_PT
    }

    fn y_pt(&self, y_mm: f64) -> f64 {
        (self.height_mm - y_mm) * MM_TO_PT
    }

    /// Places text with its baseline at `y_mm`; `x_mm` is the anchor for the alignment.
    pub fn text(&mut self, x_mm: f64, y_mm: f64, text: &str, align: TextAlign) {
        let x = match align {
            TextAlign::Left => x_mm,
            TextAlign::Center => x_mm - self.text_width(text) / 2.0,
            TextAlign::Right => x_mm - self.text_width(text),
        };
        let _ = writeln!(
            self.current,
            "BT /{} {:.1} Tf {:.3} g {:.2} {:.2} Td ({}) Tj ET",
            self.font.resource(),
            self.font_size,
            self.text_gray,
            Self::x_pt(x),
            self.y_pt(y_mm),
            escape(text)
        );
    }

    pub fn line(&mut self, x1_mm: f64, y1_mm: f64, x2_mm: f64, y2_mm: f64, width_mm: f64) {
        let _ = writeln!(
            self.current,
            "0 G {:.2} w {:.2} {:.2} m {:.2} {:.2} l S",
            width_mm * MM_TO_PT,
            Self::x_pt(x1_mm),
            self.y_pt(y1_mm),
            Self::x_pt(x2_mm),
            self.y_pt(y2_mm)
        );
    }

    pub fn fill_rect(&mut self, x_mm: f64, y_mm: f64, w_mm: f64, h_mm: f64, gray: f64) {
        let _ = writeln!(
            self.current,
            "{:.3} g {:.2} {:.2} {:.2} {:.2} re f 0 g",
            gray.clamp(0.0, 1.0),
            Self::x_pt(x_mm),
            self.y_pt(y_mm + h_mm),
            w_mm * MM_TO_PT,
            h_mm * MM_TO_PT
        );
    }

    pub fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Serialises the document. Objects 1-4 are fixed; each page adds a page and a content object.
    pub fn finish(mut self) -> Vec<u8> {
        self.new_page();
        let page_count = self.pages.len();

        let mut objects: Vec<String> = Vec::with_capacity(4 + page_count * 2);
        objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

        let kids: Vec<String> = (0..page_count)
            .map(|i| format!("{} 0 R", 5 + i * 2))
            .collect();
        objects.push(format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ));
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let media_box = format!(
            "[0 0 {:.2} {:.2}]",
            self.width_mm * MM_TO_PT,
            self.height_mm * MM_TO_PT
        );
        for (i, content) in self.pages.iter().enumerate() {
            let content_id = 6 + i * 2;
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox {} /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                media_box, content_id
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ));
        }

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            let _ = write!(out, "{} 0 obj\n{}\nendobj\n", i + 1, body);
        }

        let xref_at = out.len();
        let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            let _ = writeln!(out, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        );
        out.into_bytes()
    }
}

/// PDF literal string body. Non-ASCII Latin-1 goes out as octal escapes; anything wider becomes `?`.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", ch as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_document_structure() {
        let mut doc = PdfDocument::new(80.0, 150.0);
        doc.set_font(Font::Bold, 12.0);
        doc.text(40.0, 10.0, "Saint Mary's Parish", TextAlign::Center);
        doc.line(5.0, 18.0, 75.0, 18.0, 0.1);
        let pdf = as_text(&doc.finish());

        assert!(pdf.starts_with("%PDF-1.4\n"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("(Saint Mary's Parish) Tj"));
        assert!(pdf.contains("/Count 1"));
        assert!(pdf.contains("/F2 12.0 Tf"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let doc = PdfDocument::new(80.0, 150.0);
        let pdf = as_text(&doc.finish());
        let xref_start = pdf.find("xref\n").unwrap();
        let entries: Vec<usize> = pdf[xref_start..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();

        assert_eq!(entries.len(), 6);
        for (i, offset) in entries.iter().enumerate() {
            assert!(pdf[*offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }
    }

    #[test]
    fn test_pages_are_counted() {
        let mut doc = PdfDocument::new(80.0, 150.0);
        doc.new_page();
        doc.new_page();
        assert_eq!(doc.page_count(), 3);
        let pdf = as_text(&doc.finish());
        assert!(pdf.contains("/Kids [5 0 R 7 0 R 9 0 R] /Count 3"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape("café"), "caf\\351");
        assert_eq!(escape("₹"), "?");
    }

    #[test]
    fn test_text_width_follows_glyph_metrics() {
        let mut doc = PdfDocument::new(80.0, 150.0);
        doc.set_font(Font::Regular, 10.0);
        // Same length, very different ink
        assert!(doc.text_width("WWWW") > 3.0 * doc.text_width("iiii"));
        // 0.556 em per digit at 10 pt
        let expected = 4.0 * 5.56 / MM_TO_PT;
        assert!((doc.text_width("1000") - expected).abs() < 1e-9);

        doc.set_font(Font::Bold, 10.0);
        let bold = doc.text_width("Thomas");
        doc.set_font(Font::Regular, 10.0);
        assert!(bold > doc.text_width("Thomas"));
    }

    #[test]
    fn test_alignment_shifts_anchor() {
        let mut doc = PdfDocument::new(80.0, 150.0);
        doc.set_font(Font::Regular, 8.0);
        let width = doc.text_width("Amount");
        assert!(width > 0.0);
        doc.text(73.0, 20.0, "Amount", TextAlign::Right);
        let expected_x = format!("{:.2}", (73.0 - width) * MM_TO_PT);
        assert!(doc.current.contains(&expected_x));
    }
}
