//! Turns laid-out pages into PDF bytes.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use crate::layout::{DrawOp, Page, PAGE_HEIGHT, PAGE_WIDTH};
use crate::metrics::Face;
use crate::Result;

const MM_PER_PT: f32 = 25.4 / 72.0;
const LAYER: &str = "content";

fn mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_PT)
}

/// PDF y axis grows upward from the bottom edge.
fn flip(y: f32) -> Mm {
    mm(PAGE_HEIGHT - y)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        }
    }
}

/// Render pages into a PDF document.
pub fn render_pdf(title: &str, pages: &[Page]) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER);

    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER);
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &fonts);
    }

    let bytes = doc.save_to_bytes()?;
    tracing::debug!(pages = pages.len(), bytes = bytes.len(), "Rendered PDF");
    Ok(bytes)
}

fn draw_page(layer: &PdfLayerReference, page: &Page, fonts: &Fonts) {
    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                face,
                text,
            } => {
                layer.use_text(text.as_str(), *size, mm(*x), flip(*y), fonts.get(*face));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                thickness,
            } => {
                layer.set_outline_thickness(*thickness);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(mm(*x1), flip(*y1)), false),
                        (Point::new(mm(*x2), flip(*y2)), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }
}
