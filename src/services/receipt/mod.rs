pub mod pdf;
pub mod sink;

use chrono::Local;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::ParishInfo;
use crate::domain::receipt::{Receipt, ReceiptError, ValidReceipt};
use crate::domain::rupees;
use pdf::{Font, PdfDocument, TextAlign};
pub use sink::{DirectorySink, ReceiptSink};

#[cfg(target_arch = "wasm32")]
pub use sink::BrowserDownloadSink;

pub const PAGE_WIDTH_MM: f64 = 80.0;
pub const PAGE_HEIGHT_MM: f64 = 150.0;
const MARGIN_MM: f64 = 5.0;
/// Content below this line continues on a fresh page.
const PAGE_LIMIT_MM: f64 = 140.0;
const TOP_OF_CONTINUATION_MM: f64 = 12.0;
const TEXT_GRAY: f64 = 60.0 / 255.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReceipt {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Lays out receipts and hands them to a sink.
#[derive(Clone)]
pub struct ReceiptGenerator {
    sink: Arc<dyn ReceiptSink>,
    parish: ParishInfo,
}

impl ReceiptGenerator {
    pub fn new(sink: Arc<dyn ReceiptSink>, parish: ParishInfo) -> Self {
        Self { sink, parish }
    }

    /// Renders and delivers. `false` means the receipt was not produced; the
    /// registration it belongs to is unaffected.
    pub fn generate(&self, receipt: &Receipt) -> bool {
        let rendered = match self.render(receipt) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(
                    receipt_number = receipt.receipt_number.as_deref().unwrap_or("<none>"),
                    error = %e,
                    "Receipt not generated"
                );
                return false;
            }
        };

        match self.sink.deliver(&rendered.file_name, &rendered.bytes) {
            Ok(()) => {
                info!(
                    file_name = %rendered.file_name,
                    pages = rendered.pages,
                    "Receipt delivered"
                );
                true
            }
            Err(e) => {
                error!(file_name = %rendered.file_name, error = ?e, "Receipt delivery failed");
                false
            }
        }
    }

    pub fn render(&self, receipt: &Receipt) -> Result<RenderedReceipt, ReceiptError> {
        let valid = receipt.validate()?;
        let file_name = sink::clean_file_name(&format!("Receipt-{}.pdf", valid.receipt_number));
        let mut layout = Layout::new();
        layout.draw(&self.parish, &valid);
        let pages = layout.doc.page_count();
        Ok(RenderedReceipt {
            file_name,
            bytes: layout.doc.finish(),
            pages,
        })
    }
}

struct Layout {
    doc: PdfDocument,
    y: f64,
}

impl Layout {
    fn new() -> Self {
        Self {
            doc: PdfDocument::new(PAGE_WIDTH_MM, PAGE_HEIGHT_MM),
            y: 0.0,
        }
    }

    fn center(&self) -> f64 {
        self.doc.width() / 2.0
    }

    fn right(&self) -> f64 {
        self.doc.width() - MARGIN_MM - 2.0
    }

    fn rule(&mut self, y: f64) {
        let right = self.doc.width() - MARGIN_MM;
        self.doc.line(MARGIN_MM, y, right, y, 0.1);
    }

    /// Starts a new page when the next `needed` millimetres would cross the limit.
    fn ensure_room(&mut self, needed: f64) {
        if self.y + needed > PAGE_LIMIT_MM {
            self.doc.new_page();
            self.y = TOP_OF_CONTINUATION_MM;
        }
    }

    /// Truncates to what fits between the margins at the current font.
    fn fit(&self, text: &str, available_mm: f64) -> String {
        if self.doc.text_width(text) <= available_mm {
            return text.to_string();
        }
        let mut out: String = text.to_string();
        while !out.is_empty() && self.doc.text_width(&format!("{out}...")) > available_mm {
            out.pop();
        }
        format!("{}...", out.trim_end())
    }

    fn draw(&mut self, parish: &ParishInfo, receipt: &ValidReceipt) {
        let usable = self.doc.width() - 2.0 * MARGIN_MM;
        let center = self.center();
        let right = self.right();

        self.doc.set_font(Font::Bold, 12.0);
        self.doc.set_text_gray(0.0);
        self.doc.text(center, 10.0, &parish.name, TextAlign::Center);
        self.doc.set_font(Font::Regular, 10.0);
        self.doc
            .text(center, 15.0, "Event Registration Receipt", TextAlign::Center);
        self.rule(18.0);

        self.doc.set_font(Font::Regular, 8.0);
        self.doc.text(
            MARGIN_MM,
            23.0,
            &format!("Receipt: {}", receipt.receipt_number),
            TextAlign::Left,
        );
        let issued = receipt.issued_at.with_timezone(&Local);
        self.doc.text(
            MARGIN_MM,
            27.0,
            &format!("Date: {}", issued.format("%d/%m/%Y")),
            TextAlign::Left,
        );

        self.doc.set_font(Font::Regular, 9.0);
        self.doc.set_text_gray(TEXT_GRAY);
        self.doc.text(center, 32.0, "EVENT DETAILS", TextAlign::Center);

        self.doc.set_font(Font::Regular, 8.0);
        let start = receipt.event_start.with_timezone(&Local);
        let title = self.fit(&format!("Event: {}", receipt.event_title), usable);
        self.doc.text(MARGIN_MM, 37.0, &title, TextAlign::Left);
        self.doc.text(
            MARGIN_MM,
            41.0,
            &format!("Date: {}", start.format("%d/%m/%Y")),
            TextAlign::Left,
        );
        self.doc.text(
            MARGIN_MM,
            45.0,
            &format!("Time: {}", start.format("%I:%M %p")),
            TextAlign::Left,
        );
        let location = self.fit(&format!("Location: {}", receipt.location), usable);
        self.doc.text(MARGIN_MM, 49.0, &location, TextAlign::Left);
        self.rule(52.0);

        self.doc.set_font(Font::Regular, 9.0);
        self.doc
            .text(center, 57.0, "REGISTRATION DETAILS", TextAlign::Center);
        self.doc.set_font(Font::Regular, 8.0);
        self.doc.text(
            MARGIN_MM,
            62.0,
            &format!("Type: {}", receipt.registration_type),
            TextAlign::Left,
        );

        self.y = 67.0;
        self.table_header();

        for (index, line) in receipt.lines.iter().enumerate() {
            let height = if line.detail.is_some() { 7.5 } else { 4.0 };
            if self.y + height > PAGE_LIMIT_MM {
                self.doc.new_page();
                self.y = TOP_OF_CONTINUATION_MM;
                self.table_header();
            }

            self.doc.set_font(Font::Regular, 7.0);
            self.doc.set_text_gray(TEXT_GRAY);
            let name = self.fit(&format!("{}. {}", index + 1, line.name), usable - 18.0);
            self.doc.text(MARGIN_MM + 2.0, self.y, &name, TextAlign::Left);
            self.doc
                .text(right, self.y, &rupees(line.fee), TextAlign::Right);
            self.y += 4.0;

            if let Some(detail) = &line.detail {
                self.doc.set_font(Font::Regular, 6.0);
                let detail = self.fit(detail, usable - 6.0);
                self.doc
                    .text(MARGIN_MM + 5.0, self.y - 0.5, &detail, TextAlign::Left);
                self.y += 3.5;
            }
        }

        self.ensure_room(12.0);
        self.doc.set_font(Font::Regular, 7.0);
        self.doc.text(
            MARGIN_MM + 2.0,
            self.y,
            &format!("@ {} per person", rupees(receipt.per_person_fee)),
            TextAlign::Left,
        );
        self.y += 3.0;
        self.rule(self.y);
        self.y += 5.0;
        self.doc.set_font(Font::Bold, 9.0);
        self.doc.set_text_gray(0.0);
        self.doc
            .text(MARGIN_MM + 2.0, self.y, "Total Amount:", TextAlign::Left);
        self.doc
            .text(right, self.y, &rupees(receipt.total_fee), TextAlign::Right);
        self.y += 2.0;
        self.rule(self.y);

        self.ensure_room(18.0);
        self.y += 5.0;
        self.doc.set_font(Font::Regular, 8.0);
        self.doc
            .text(center, self.y, "Thank you for registering!", TextAlign::Center);
        self.y += 4.0;
        self.doc.set_font(Font::Regular, 7.0);
        self.doc.text(
            center,
            self.y,
            "Please present this receipt at the event",
            TextAlign::Center,
        );
        self.y += 6.0;
        self.doc.set_font(Font::Regular, 6.0);
        self.doc.text(
            center,
            self.y,
            &format!("Phone: {}", parish.phone),
            TextAlign::Center,
        );
        self.y += 3.0;
        self.doc.text(
            center,
            self.y,
            &format!("Email: {}", parish.email),
            TextAlign::Center,
        );
    }

    fn table_header(&mut self) {
        let width = self.doc.width() - 2.0 * MARGIN_MM;
        self.doc.fill_rect(MARGIN_MM, self.y, width, 7.0, 240.0 / 255.0);
        self.doc.set_font(Font::Bold, 8.0);
        self.doc.set_text_gray(0.0);
        self.doc
            .text(MARGIN_MM + 2.0, self.y + 5.0, "Description", TextAlign::Left);
        let right = self.right();
        self.doc.text(right, self.y + 5.0, "Amount", TextAlign::Right);
        self.y += 9.0;
    }
}
