//! PDF export of counseling session records.
//!
//! Export happens in two steps: [`attention::layout_attention`] places every
//! piece of text and every rule on A4 pages (wrapping free text and breaking
//! pages as it goes, then stamping footers once the page count is known), and
//! [`render::render_pdf`] writes those pages out with `printpdf`.
//!
//! # Example
//!
//! ```no_run
//! use report::{export_attention, AttentionReport};
//!
//! # fn main() -> report::Result<()> {
//! let record = AttentionReport {
//!     student_name: "Ana Garcia".to_string(),
//!     date: "2024-04-12".to_string(),
//!     ..Default::default()
//! };
//! let exported = export_attention(&record, chrono::Local::now().naive_local())?;
//! std::fs::write(&exported.file_name, &exported.bytes).ok();
//! # Ok(())
//! # }
//! ```

pub mod attention;
pub mod layout;
pub mod metrics;
pub mod render;
pub mod wrap;

pub use attention::{format_date, layout_attention, AttentionReport};

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur while producing a document.
#[derive(Debug, Error)]
pub enum ReportError {
    /// PDF library error.
    #[error("pdf error: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// A finished document ready to download.
#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub file_name: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Lay out and render an attention record.
pub fn export_attention(report: &AttentionReport, generated_at: NaiveDateTime) -> Result<ExportedReport> {
    let pages = layout_attention(report, generated_at);
    let file_name = report.file_name();
    let bytes = render::render_pdf(&file_name, &pages)?;

    tracing::debug!(file = %file_name, pages = pages.len(), "Attention record rendered");

    Ok(ExportedReport {
        file_name,
        page_count: pages.len(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 12)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_export_empty_record() {
        let exported = export_attention(&AttentionReport::default(), generated_at()).unwrap();
        assert_eq!(exported.page_count, 1);
        assert!(exported.bytes.starts_with(b"%PDF"));
        assert_eq!(exported.file_name, "Attention__.pdf");
    }

    #[test]
    fn test_export_multi_page_record() {
        let record = AttentionReport {
            student_name: "Ana Garcia".to_string(),
            grade: "5th A".to_string(),
            date: "2024-04-12".to_string(),
            time: "09:30".to_string(),
            recommendations: "Practice breathing exercises before tests. ".repeat(300),
            psychologist_name: "Maria Lopez".to_string(),
            ..Default::default()
        };
        let exported = export_attention(&record, generated_at()).unwrap();

        assert!(exported.page_count > 1);
        assert!(exported.bytes.starts_with(b"%PDF"));
        assert_eq!(exported.file_name, "Attention_Ana_Garcia_2024-04-12.pdf");
    }
}
