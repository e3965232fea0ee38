//! Layout of the attention record document.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::layout::{Page, PageLayout, TextStyle};
use crate::metrics::Face;

const TITLE: TextStyle = TextStyle::new(16.0, Face::Bold, 22.0);
const SUBTITLE: TextStyle = TextStyle::new(10.0, Face::Regular, 14.0);
const HEADING: TextStyle = TextStyle::new(12.0, Face::Bold, 18.0);
const BODY: TextStyle = TextStyle::new(10.5, Face::Regular, 14.5);
const SMALL: TextStyle = TextStyle::new(9.0, Face::Regular, 12.0);

const LABEL_COLUMN: f32 = 130.0;
const SIGNATURE_HEIGHT: f32 = 86.0;
const SIGNATURE_WIDTH: f32 = 200.0;

/// The data printed on an attention record.
///
/// Owned so an export keeps working if the stored record changes or is
/// deleted while the document is being produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionReport {
    pub student_name: String,
    pub grade: String,
    /// `YYYY-MM-DD`; other strings are printed as-is.
    pub date: String,
    pub time: String,
    pub reason: String,
    pub observations: String,
    pub recommendations: String,
    pub psychologist_name: String,
}

impl AttentionReport {
    /// Deterministic download name: `Attention_<name>_<date>.pdf`.
    ///
    /// Whitespace runs in the student's name become one underscore; path
    /// separators, quotes and control characters are replaced too, so the
    /// name is always a valid `Content-Disposition` value.
    pub fn file_name(&self) -> String {
        let name = self
            .student_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        let clean = |s: &str| -> String {
            s.chars()
                .map(|c| {
                    if matches!(c, '/' | '\\' | '"') || c.is_control() {
                        '_'
                    } else {
                        c
                    }
                })
                .collect()
        };
        format!("Attention_{}_{}.pdf", clean(&name), clean(self.date.trim()))
    }

    /// Short title repeated at the top of continuation pages.
    fn continuation_title(&self) -> String {
        let name = self.student_name.trim();
        if name.is_empty() {
            "Psychological Attention Record (continued)".to_string()
        } else {
            format!("Psychological Attention Record - {} (continued)", name)
        }
    }
}

/// Format a `YYYY-MM-DD` date for print, e.g. "April 12, 2024".
///
/// Unparseable dates are returned unchanged.
pub fn format_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Lay out an attention record, footers included.
pub fn layout_attention(report: &AttentionReport, generated_at: NaiveDateTime) -> Vec<Page> {
    let mut layout = PageLayout::new(report.continuation_title());

    layout.centered_line("PSYCHOLOGICAL ATTENTION RECORD", TITLE);
    layout.centered_line("School Psychology Office", SUBTITLE);
    layout.advance(4.0);
    layout.rule(1.0);
    layout.advance(16.0);

    let rows = vec![
        vec!["Student".to_string(), report.student_name.clone()],
        vec!["Grade / Section".to_string(), report.grade.clone()],
        vec!["Date".to_string(), format_date(&report.date)],
        vec!["Time".to_string(), report.time.clone()],
        vec!["Psychologist".to_string(), report.psychologist_name.clone()],
    ];
    layout.table(&[LABEL_COLUMN, 0.0], &rows, BODY, Face::Bold);
    layout.advance(20.0);

    for (title, body) in [
        ("Reason for Consultation", &report.reason),
        ("Observations", &report.observations),
        ("Recommendations", &report.recommendations),
    ] {
        section(&mut layout, title, body);
    }

    signature(&mut layout, &report.psychologist_name);

    layout.stamp_footers(&format!(
        "Generated on {}",
        generated_at.format("%Y-%m-%d %H:%M")
    ));
    layout.into_pages()
}

fn section(layout: &mut PageLayout, title: &str, body: &str) {
    // Keep the heading on the same page as the first line of text.
    layout.ensure_space(HEADING.line_height + 4.0 + BODY.line_height);
    layout.line(crate::layout::MARGIN_X, title, HEADING);
    layout.rule(0.5);
    layout.advance(4.0);
    layout.paragraph(body, BODY);
    layout.advance(14.0);
}

fn signature(layout: &mut PageLayout, psychologist_name: &str) {
    layout.ensure_space(SIGNATURE_HEIGHT);
    layout.advance(44.0);

    let left = (crate::layout::PAGE_WIDTH - SIGNATURE_WIDTH) / 2.0;
    layout.rule_between(left, left + SIGNATURE_WIDTH, 0.8);
    layout.advance(6.0);

    let name = psychologist_name.trim();
    layout.centered_line(if name.is_empty() { "-" } else { name }, SMALL);
    layout.centered_line("School Psychologist", SMALL);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DrawOp, CONTENT_BOTTOM, PLACEHOLDER};

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 12)
            .unwrap()
            .and_hms_opt(16, 45, 0)
            .unwrap()
    }

    fn report() -> AttentionReport {
        AttentionReport {
            student_name: "Ana Garcia".to_string(),
            grade: "5th A".to_string(),
            date: "2024-04-12".to_string(),
            time: "09:30".to_string(),
            reason: "Teacher referral for distraction in class.".to_string(),
            observations: "Calm and cooperative.".to_string(),
            recommendations: "Follow up in two weeks.".to_string(),
            psychologist_name: "Maria Lopez".to_string(),
        }
    }

    fn assert_footers_match(pages: &[Page]) {
        let total = pages.len();
        for (i, page) in pages.iter().enumerate() {
            let expected = format!("Page {} of {}", i + 1, total);
            assert!(
                page.texts().any(|t| t == expected),
                "page {} lacks footer {:?}",
                i + 1,
                expected
            );
        }
    }

    #[test]
    fn test_short_record_fits_one_page() {
        let pages = layout_attention(&report(), generated_at());
        assert_eq!(pages.len(), 1);

        let texts: Vec<&str> = pages[0].texts().collect();
        assert!(texts.contains(&"PSYCHOLOGICAL ATTENTION RECORD"));
        assert!(texts.contains(&"April 12, 2024"));
        assert!(texts.contains(&"Generated on 2024-04-12 16:45"));
        assert_footers_match(&pages);
    }

    #[test]
    fn test_empty_free_text_prints_placeholders() {
        let empty = AttentionReport {
            reason: String::new(),
            observations: "   ".to_string(),
            recommendations: String::new(),
            ..report()
        };
        let pages = layout_attention(&empty, generated_at());

        let dashes = pages
            .iter()
            .flat_map(|p| p.texts())
            .filter(|t| *t == PLACEHOLDER)
            .count();
        assert_eq!(dashes, 3);
    }

    #[test]
    fn test_fully_empty_record_still_lays_out() {
        let pages = layout_attention(&AttentionReport::default(), generated_at());
        assert_eq!(pages.len(), 1);
        assert_footers_match(&pages);
    }

    #[test]
    fn test_long_observations_span_pages_with_matching_footers() {
        let long = AttentionReport {
            observations: "The student described several situations at home and school. ".repeat(200),
            ..report()
        };
        let pages = layout_attention(&long, generated_at());

        assert!(pages.len() > 1);
        assert_footers_match(&pages);

        for page in &pages[1..] {
            assert_eq!(
                page.texts().next(),
                Some("Psychological Attention Record - Ana Garcia (continued)")
            );
        }

        // Body text never runs into the footer area.
        for page in &pages {
            for op in &page.ops {
                if let DrawOp::Text { y, text, .. } = op {
                    if !text.starts_with("Page ") && !text.starts_with("Generated on") {
                        assert!(*y <= CONTENT_BOTTOM, "{:?} drawn at {}", text, y);
                    }
                }
            }
        }
    }

    #[test]
    fn test_signature_follows_last_section() {
        let pages = layout_attention(&report(), generated_at());
        let texts: Vec<&str> = pages.last().unwrap().texts().collect();
        let recommendations = texts.iter().position(|t| *t == "Follow up in two weeks.").unwrap();
        let signature = texts.iter().position(|t| *t == "School Psychologist").unwrap();
        assert!(signature > recommendations);
    }

    #[test]
    fn test_invalid_date_printed_verbatim() {
        assert_eq!(format_date("2024-13-45"), "2024-13-45");
        assert_eq!(format_date("next monday"), "next monday");
        assert_eq!(format_date("2024-01-05"), "January 5, 2024");

        let odd = AttentionReport {
            date: "not a date".to_string(),
            ..report()
        };
        let pages = layout_attention(&odd, generated_at());
        assert!(pages[0].texts().any(|t| t == "not a date"));
    }

    #[test]
    fn test_file_name() {
        let r = AttentionReport {
            student_name: "  Ana \t Maria  Garcia ".to_string(),
            ..report()
        };
        assert_eq!(r.file_name(), "Attention_Ana_Maria_Garcia_2024-04-12.pdf");

        let odd = AttentionReport {
            student_name: "A/B".to_string(),
            date: "12/04/2024".to_string(),
            ..report()
        };
        assert_eq!(odd.file_name(), "Attention_A_B_12_04_2024.pdf");

        let control = AttentionReport {
            student_name: "Ana\u{1}Garcia\u{7f}".to_string(),
            ..report()
        };
        assert_eq!(control.file_name(), "Attention_Ana_Garcia__2024-04-12.pdf");
    }
}
