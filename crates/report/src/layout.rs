//! Page layout with a vertical cursor and page-break bookkeeping.
//!
//! Coordinates are PostScript points on an A4 page, measured from the top-left
//! corner. Text `y` values are baselines. Nothing here touches the PDF
//! library; [`crate::render`] turns finished pages into a document.

use crate::metrics::{text_width, Face};
use crate::wrap::wrap_text;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN_X: f32 = 50.0;
pub const MARGIN_TOP: f32 = 56.0;
pub const MARGIN_BOTTOM: f32 = 64.0;

/// Lowest point content may reach.
pub const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN_BOTTOM;

const CONTINUATION_SIZE: f32 = 9.0;
const CONTINUATION_HEIGHT: f32 = 24.0;
const FOOTER_SIZE: f32 = 8.0;
const FOOTER_BASELINE: f32 = PAGE_HEIGHT - 32.0;
const CELL_PADDING: f32 = 5.0;

/// Text drawn for empty free-text fields.
pub const PLACEHOLDER: &str = "-";

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        face: Face,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
    },
}

/// Drawing instructions for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// All text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Line { .. } => None,
        })
    }
}

/// Font settings for a block of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub face: Face,
    pub line_height: f32,
}

impl TextStyle {
    pub const fn new(size: f32, face: Face, line_height: f32) -> Self {
        Self {
            size,
            face,
            line_height,
        }
    }
}

/// Accumulates pages while tracking where the next block goes.
#[derive(Debug)]
pub struct PageLayout {
    pages: Vec<Page>,
    cursor: f32,
    continuation: String,
}

impl PageLayout {
    /// Start a layout on a fresh first page.
    ///
    /// `continuation` is printed at the top of every following page.
    pub fn new(continuation: impl Into<String>) -> Self {
        Self {
            pages: vec![Page::default()],
            cursor: MARGIN_TOP,
            continuation: continuation.into(),
        }
    }

    /// Horizontal space between the side margins.
    pub fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN_X
    }

    /// Vertical space a continuation page offers below its mini-header.
    pub fn usable_height() -> f32 {
        CONTENT_BOTTOM - MARGIN_TOP - CONTINUATION_HEIGHT
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Space left above the bottom margin on the current page.
    pub fn remaining(&self) -> f32 {
        CONTENT_BOTTOM - self.cursor
    }

    /// Break to a new page unless `height` fits on the current one.
    ///
    /// Returns `true` if a page was started.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if height > self.remaining() {
            self.new_page();
            true
        } else {
            false
        }
    }

    /// Start a page with the continuation mini-header.
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = MARGIN_TOP;

        let header = self.continuation.clone();
        self.push_text(MARGIN_X, MARGIN_TOP + CONTINUATION_SIZE, CONTINUATION_SIZE, Face::Bold, header);
        self.push_line(
            MARGIN_X,
            MARGIN_TOP + CONTINUATION_SIZE + 6.0,
            PAGE_WIDTH - MARGIN_X,
            MARGIN_TOP + CONTINUATION_SIZE + 6.0,
            0.5,
        );
        self.cursor += CONTINUATION_HEIGHT;
    }

    /// Move the cursor down.
    pub fn advance(&mut self, dy: f32) {
        self.cursor += dy;
    }

    /// Draw one line of text at the cursor and move below it.
    pub fn line(&mut self, x: f32, text: &str, style: TextStyle) {
        let baseline = self.baseline(style.size);
        self.push_text(x, baseline, style.size, style.face, text.to_string());
        self.cursor += style.line_height;
    }

    /// Draw one line of text centered between the page edges.
    pub fn centered_line(&mut self, text: &str, style: TextStyle) {
        let x = (PAGE_WIDTH - text_width(text, style.size, style.face)) / 2.0;
        self.line(x.max(MARGIN_X), text, style);
    }

    /// Draw a horizontal rule across the content width at the cursor.
    pub fn rule(&mut self, thickness: f32) {
        let y = self.cursor;
        self.push_line(MARGIN_X, y, PAGE_WIDTH - MARGIN_X, y, thickness);
    }

    /// Draw a horizontal rule between two x positions at the cursor.
    pub fn rule_between(&mut self, x1: f32, x2: f32, thickness: f32) {
        let y = self.cursor;
        self.push_line(x1, y, x2, y, thickness);
    }

    /// Draw wrapped text, checking every line against the page break.
    ///
    /// Blank input prints [`PLACEHOLDER`].
    pub fn paragraph(&mut self, text: &str, style: TextStyle) {
        let mut lines = wrap_text(text, Self::content_width(), style.size, style.face);
        if lines.is_empty() {
            lines.push(PLACEHOLDER.to_string());
        }

        for line in &lines {
            self.ensure_space(style.line_height);
            self.line(MARGIN_X, line, style);
        }
    }

    /// Draw a bordered table across the content width.
    ///
    /// `widths` are the column widths (the last column takes what is left);
    /// the first column is drawn in `label_face`. Rows are kept whole when
    /// they fit on a page and split line by line when they don't.
    pub fn table(&mut self, widths: &[f32], rows: &[Vec<String>], style: TextStyle, label_face: Face) {
        let columns = column_spans(widths);

        for row in rows {
            let cells: Vec<Vec<String>> = columns
                .iter()
                .zip(row)
                .enumerate()
                .map(|(i, ((_, width), value))| {
                    let face = if i == 0 { label_face } else { style.face };
                    let mut lines = wrap_text(value, width - 2.0 * CELL_PADDING, style.size, face);
                    if lines.is_empty() {
                        lines.push(PLACEHOLDER.to_string());
                    }
                    lines
                })
                .collect();

            let line_count = cells.iter().map(Vec::len).max().unwrap_or(1);
            let height = line_count as f32 * style.line_height + 2.0 * CELL_PADDING;
            if height <= Self::usable_height() {
                self.ensure_space(height);
            }

            let mut start = 0;
            while start < line_count {
                if self.remaining() < style.line_height + 2.0 * CELL_PADDING {
                    self.new_page();
                }
                let fit = ((self.remaining() - 2.0 * CELL_PADDING) / style.line_height).floor() as usize;
                let end = (start + fit.max(1)).min(line_count);
                self.table_segment(&columns, &cells, start..end, style, label_face);
                start = end;
            }
        }
    }

    fn table_segment(
        &mut self,
        columns: &[(f32, f32)],
        cells: &[Vec<String>],
        range: std::ops::Range<usize>,
        style: TextStyle,
        label_face: Face,
    ) {
        let top = self.cursor;
        let height = range.len() as f32 * style.line_height + 2.0 * CELL_PADDING;
        let bottom = top + height;
        let left = MARGIN_X;
        let right = PAGE_WIDTH - MARGIN_X;

        self.push_line(left, top, right, top, 0.5);
        self.push_line(left, bottom, right, bottom, 0.5);
        self.push_line(left, top, left, bottom, 0.5);
        for (x, _) in columns.iter().skip(1) {
            self.push_line(*x, top, *x, bottom, 0.5);
        }
        self.push_line(right, top, right, bottom, 0.5);

        for (i, ((x, _), lines)) in columns.iter().zip(cells).enumerate() {
            let face = if i == 0 { label_face } else { style.face };
            for (offset, line) in lines
                .iter()
                .enumerate()
                .skip(range.start)
                .take(range.len())
                .map(|(index, line)| (index - range.start, line))
            {
                let baseline =
                    top + CELL_PADDING + offset as f32 * style.line_height + style.size * 0.8;
                self.push_text(x + CELL_PADDING, baseline, style.size, face, line.clone());
            }
        }

        self.cursor = bottom;
    }

    /// Stamp `left_text` and "Page X of N" at the foot of every page.
    ///
    /// Runs after layout so `N` is the final page count.
    pub fn stamp_footers(&mut self, left_text: &str) {
        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            let number = format!("Page {} of {}", index + 1, total);
            let number_x = PAGE_WIDTH - MARGIN_X - text_width(&number, FOOTER_SIZE, Face::Regular);
            let rule_y = FOOTER_BASELINE - FOOTER_SIZE - 4.0;

            page.ops.push(DrawOp::Line {
                x1: MARGIN_X,
                y1: rule_y,
                x2: PAGE_WIDTH - MARGIN_X,
                y2: rule_y,
                thickness: 0.3,
            });
            page.ops.push(DrawOp::Text {
                x: MARGIN_X,
                y: FOOTER_BASELINE,
                size: FOOTER_SIZE,
                face: Face::Regular,
                text: left_text.to_string(),
            });
            page.ops.push(DrawOp::Text {
                x: number_x,
                y: FOOTER_BASELINE,
                size: FOOTER_SIZE,
                face: Face::Regular,
                text: number,
            });
        }
    }

    /// Finish the layout and hand back its pages.
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    fn baseline(&self, size: f32) -> f32 {
        self.cursor + size * 0.8
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn push_text(&mut self, x: f32, y: f32, size: f32, face: Face, text: String) {
        if text.is_empty() {
            return;
        }
        self.current_page().ops.push(DrawOp::Text {
            x,
            y,
            size,
            face,
            text,
        });
    }

    fn push_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32) {
        self.current_page().ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            thickness,
        });
    }
}

/// Left edge and width of each table column.
fn column_spans(widths: &[f32]) -> Vec<(f32, f32)> {
    let mut spans = Vec::with_capacity(widths.len());
    let mut x = MARGIN_X;
    let right = PAGE_WIDTH - MARGIN_X;
    for (i, width) in widths.iter().enumerate() {
        let width = if i + 1 == widths.len() { right - x } else { *width };
        spans.push((x, width));
        x += width;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: TextStyle = TextStyle::new(10.0, Face::Regular, 14.0);

    fn all_content_within_margins(pages: &[Page]) -> bool {
        pages.iter().all(|page| {
            page.ops.iter().all(|op| match op {
                DrawOp::Text { y, .. } => *y <= CONTENT_BOTTOM,
                DrawOp::Line { y1, y2, .. } => *y1 <= CONTENT_BOTTOM && *y2 <= CONTENT_BOTTOM,
            })
        })
    }

    #[test]
    fn test_ensure_space_breaks_only_when_needed() {
        let mut layout = PageLayout::new("cont.");
        assert!(!layout.ensure_space(100.0));
        assert_eq!(layout.page_count(), 1);

        layout.advance(layout.remaining() - 10.0);
        assert!(layout.ensure_space(14.0));
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.cursor(), MARGIN_TOP + CONTINUATION_HEIGHT);

        let pages = layout.into_pages();
        assert_eq!(pages[1].texts().next(), Some("cont."));
    }

    #[test]
    fn test_paragraph_splits_across_pages() {
        let mut layout = PageLayout::new("cont.");
        let text = "word ".repeat(3000);
        layout.paragraph(&text, BODY);

        assert!(layout.page_count() > 1);
        assert!(all_content_within_margins(&layout.into_pages()));
    }

    #[test]
    fn test_blank_paragraph_prints_placeholder() {
        let mut layout = PageLayout::new("cont.");
        layout.paragraph("   ", BODY);
        let pages = layout.into_pages();
        assert_eq!(pages[0].texts().collect::<Vec<_>>(), vec![PLACEHOLDER]);
    }

    #[test]
    fn test_table_keeps_fitting_rows_whole() {
        let mut layout = PageLayout::new("cont.");
        layout.advance(layout.remaining() - 20.0);

        let rows = vec![vec!["Student".to_string(), "Ana Garcia".to_string()]];
        layout.table(&[120.0, 0.0], &rows, BODY, Face::Bold);

        let pages = layout.into_pages();
        assert_eq!(pages.len(), 2);
        let texts: Vec<&str> = pages[1].texts().collect();
        assert_eq!(texts, vec!["cont.", "Student", "Ana Garcia"]);
    }

    #[test]
    fn test_table_splits_rows_taller_than_a_page() {
        let mut layout = PageLayout::new("cont.");
        let huge = "name ".repeat(4000);
        let rows = vec![
            vec!["Student".to_string(), huge],
            vec!["Date".to_string(), "2024-04-12".to_string()],
        ];
        layout.table(&[120.0, 0.0], &rows, BODY, Face::Bold);

        assert!(layout.page_count() > 2);
        let pages = layout.into_pages();
        assert!(all_content_within_margins(&pages));
        assert_eq!(pages[0].texts().next(), Some("Student"));
        assert!(pages.last().unwrap().texts().any(|t| t == "2024-04-12"));
    }

    #[test]
    fn test_footers_carry_final_page_count() {
        let mut layout = PageLayout::new("cont.");
        layout.new_page();
        layout.new_page();
        layout.stamp_footers("Generated today");

        let pages = layout.into_pages();
        for (i, page) in pages.iter().enumerate() {
            let expected = format!("Page {} of 3", i + 1);
            assert!(page.texts().any(|t| t == expected));
            assert!(page.texts().any(|t| t == "Generated today"));
        }
    }

    #[test]
    fn test_column_spans_fill_content_width() {
        let spans = column_spans(&[120.0, 0.0]);
        assert_eq!(spans[0], (MARGIN_X, 120.0));
        assert_eq!(spans[1].0, MARGIN_X + 120.0);
        assert!((spans[1].0 + spans[1].1 - (PAGE_WIDTH - MARGIN_X)).abs() < 0.001);
    }
}
