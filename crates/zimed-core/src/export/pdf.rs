//! Render a [`Document`] to PDF bytes with `printpdf`.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use super::ExportError;
use super::layout::{Document, Font, Page};

const LAYER: &str = "Layer 1";
const RULE_THICKNESS_PT: f32 = 0.3;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
        }
    }
}

fn draw_page(layer: &PdfLayerReference, page: &Page, page_height: f32, fonts: &Fonts) {
    layer.set_outline_thickness(RULE_THICKNESS_PT);
    for rule in &page.rules {
        // Layout coordinates run down from the top edge; PDF runs up.
        let line = Line {
            points: vec![
                (Point::new(Mm(rule.from.0), Mm(page_height - rule.from.1)), false),
                (Point::new(Mm(rule.to.0), Mm(page_height - rule.to.1)), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }
    for run in &page.runs {
        layer.use_text(
            run.text.as_str(),
            run.size_pt,
            Mm(run.x_mm),
            Mm(page_height - run.y_mm),
            fonts.get(run.font),
        );
    }
}

/// Encode `document` as PDF.
pub fn render_pdf(document: &Document) -> Result<Vec<u8>, ExportError> {
    let (width, height) = document.orientation.size_mm();
    let (doc, first_page, first_layer) =
        PdfDocument::new(document.title.as_str(), Mm(width), Mm(height), LAYER);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?,
    };

    for (i, page) in document.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(width), Mm(height), LAYER)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        draw_page(&layer, page, height, &fonts);
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    tracing::debug!(
        title = %document.title,
        pages = document.pages.len(),
        bytes = bytes.len(),
        "rendered pdf"
    );
    Ok(bytes)
}
