use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

use crate::models::quote::QuoteDocument;
use crate::services::pricing_service::PricingService;

/// Width the quote layout is designed at, in layout units.
pub const LAYOUT_WIDTH: f32 = 800.0;

pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;
/// 10 mm on every side.
pub const PAGE_MARGIN_PT: f32 = 28.35;

const LEFT: f32 = 40.0;
const RIGHT: f32 = LAYOUT_WIDTH - 40.0;
const COMPANY_NAME: &str = "NORTHWIND DIGITAL";

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Nothing to render: layout has no area")]
    EmptyLayout,
    #[error("Failed to encode page content: {0}")]
    Encode(String),
    #[error("Failed to write document: {0}")]
    Write(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        /// Baseline, measured down from the top of the layout.
        y: f32,
        size: f32,
        bold: bool,
        gray: f32,
        text: String,
    },
    Rule {
        x: f32,
        y: f32,
        width: f32,
        thickness: f32,
    },
    Block {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
    },
}

/// Fixed-width page model in top-down layout units.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub width: f32,
    pub height: f32,
    pub elements: Vec<Element>,
}

/// Placement of a layout on the page: one uniform scale, top-aligned, centred horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFit {
    pub scale: f32,
    pub origin_x: f32,
    pub origin_top: f32,
    pub width: f32,
    pub height: f32,
}

impl PageFit {
    fn x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        self.origin_top - y * self.scale
    }
}

/// Scale to the printable width first; if that makes the layout taller than
/// the printable height, scale down further so the whole layout fits.
pub fn fit_to_page(width: f32, height: f32) -> Result<PageFit, RenderError> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(RenderError::EmptyLayout);
    }

    let available_width = A4_WIDTH_PT - 2.0 * PAGE_MARGIN_PT;
    let available_height = A4_HEIGHT_PT - 2.0 * PAGE_MARGIN_PT;

    let mut scale = available_width / width;
    if height * scale > available_height {
        scale = available_height / height;
    }

    let fitted_width = width * scale;
    Ok(PageFit {
        scale,
        origin_x: PAGE_MARGIN_PT + (available_width - fitted_width) / 2.0,
        origin_top: A4_HEIGHT_PT - PAGE_MARGIN_PT,
        width: fitted_width,
        height: height * scale,
    })
}

struct LayoutBuilder {
    y: f32,
    elements: Vec<Element>,
}

impl LayoutBuilder {
    fn text(&mut self, x: f32, size: f32, bold: bool, gray: f32, text: impl Into<String>) {
        self.elements.push(Element::Text {
            x,
            y: self.y,
            size,
            bold,
            gray,
            text: text.into(),
        });
    }

    fn text_right(&mut self, right: f32, size: f32, bold: bool, gray: f32, text: &str) {
        let x = right - approx_text_width(text, size, bold);
        self.text(x, size, bold, gray, text);
    }

    fn wrapped(&mut self, x: f32, size: f32, gray: f32, text: &str, line_height: f32) {
        let max_chars = ((RIGHT - x) / (size * 0.5)).floor().max(10.0) as usize;
        for line in wrap_text(text, max_chars) {
            self.text(x, size, false, gray, line);
            self.y += line_height;
        }
    }

    fn rule(&mut self) {
        self.elements.push(Element::Rule {
            x: LEFT,
            y: self.y,
            width: RIGHT - LEFT,
            thickness: 0.75,
        });
    }

    fn total_row(&mut self, label: &str, value: &str, size: f32, bold: bool) {
        self.text(LEFT + 360.0, size, bold, 0.15, label);
        self.text_right(RIGHT, size, bold, 0.15, value);
        self.y += size + 10.0;
    }
}

impl DocumentLayout {
    pub fn for_quote(document: &QuoteDocument) -> Self {
        let mut builder = LayoutBuilder {
            y: 0.0,
            elements: Vec::new(),
        };

        builder.elements.push(Element::Block {
            x: 0.0,
            y: 0.0,
            width: LAYOUT_WIDTH,
            height: 120.0,
            gray: 0.12,
        });
        builder.y = 60.0;
        builder.text(LEFT, 28.0, true, 1.0, COMPANY_NAME);
        builder.text_right(RIGHT, 16.0, true, 1.0, &document.reference);
        builder.y = 92.0;
        builder.text(LEFT, 14.0, false, 0.85, "Project Estimate");
        builder.text_right(
            RIGHT,
            12.0,
            false,
            0.85,
            &format!("Issued {}", document.issued_on.format("%B %-d, %Y")),
        );

        builder.y = 170.0;
        builder.text(LEFT, 18.0, true, 0.1, "Selected services");
        builder.y += 34.0;

        for line in &document.lines {
            builder.text(LEFT, 14.0, true, 0.1, &line.name);
            builder.text_right(
                RIGHT,
                14.0,
                true,
                0.1,
                &PricingService::format_currency(line.amount),
            );
            builder.y += 20.0;
            if !line.description.is_empty() {
                builder.wrapped(LEFT, 11.0, 0.3, &line.description, 16.0);
            }
            if !line.features.is_empty() {
                builder.wrapped(
                    LEFT,
                    10.0,
                    0.4,
                    &format!("Includes: {}", line.features.join(", ")),
                    15.0,
                );
            }
            builder.text(
                LEFT,
                10.0,
                false,
                0.45,
                format!(
                    "Base {} x {:.2} complexity factor",
                    PricingService::format_currency(line.base_price),
                    line.complexity_factor
                ),
            );
            builder.y += 14.0;
            builder.rule();
            builder.y += 26.0;
        }

        builder.text(LEFT, 18.0, true, 0.1, "Project configuration");
        builder.y += 28.0;
        for field in &document.configuration {
            builder.text(LEFT, 12.0, true, 0.2, &field.label);
            builder.text(LEFT + 160.0, 12.0, false, 0.2, &field.value);
            builder.y += 20.0;
        }

        builder.y += 10.0;
        builder.rule();
        builder.y += 26.0;
        let totals = &document.totals;
        builder.total_row(
            "Subtotal",
            &PricingService::format_currency(totals.subtotal),
            12.0,
            false,
        );
        builder.total_row(
            "Timeline multiplier",
            &format!("x{:.2}", totals.timeline_multiplier),
            12.0,
            false,
        );
        builder.total_row(
            "Support multiplier",
            &format!("x{:.2}", totals.support_multiplier),
            12.0,
            false,
        );
        builder.total_row(
            "Support fee (first month)",
            &PricingService::format_currency(totals.support_fee),
            12.0,
            false,
        );
        builder.y += 6.0;
        builder.total_row("Estimated total", &totals.formatted_total, 18.0, true);

        builder.y += 20.0;
        for note in &document.notes {
            builder.wrapped(LEFT, 10.0, 0.35, note, 15.0);
        }

        builder.y += 20.0;
        builder.text(
            LEFT,
            10.0,
            false,
            0.35,
            format!(
                "Questions about {}? Contact {} - valid until {}.",
                document.reference,
                document.contact_email,
                document.valid_until.format("%B %-d, %Y")
            ),
        );

        Self {
            width: LAYOUT_WIDTH,
            height: builder.y + 40.0,
            elements: builder.elements,
        }
    }
}

pub struct PdfService;

impl PdfService {
    /// Render a quote to a single-page PDF held in memory. Nothing is returned
    /// unless the whole document was produced.
    pub fn render_quote(document: &QuoteDocument) -> Result<Vec<u8>, RenderError> {
        Self::render_layout(&DocumentLayout::for_quote(document))
    }

    pub fn render_layout(layout: &DocumentLayout) -> Result<Vec<u8>, RenderError> {
        let fit = fit_to_page(layout.width, layout.height)?;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let content: Content<Vec<Operation>> = Content {
            operations: layout
                .elements
                .iter()
                .flat_map(|element| operations_for(element, &fit))
                .collect(),
        };
        let encoded = content
            .encode()
            .map_err(|err| RenderError::Encode(err.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), A4_WIDTH_PT.into(), A4_HEIGHT_PT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|err| RenderError::Write(err.to_string()))?;
        Ok(bytes)
    }
}

fn operations_for(element: &Element, fit: &PageFit) -> Vec<Operation> {
    match element {
        Element::Text {
            x,
            y,
            size,
            bold,
            gray,
            text,
        } => vec![
            Operation::new("q", vec![]),
            Operation::new("g", vec![(*gray).into()]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    if *bold { "F2" } else { "F1" }.into(),
                    (size * fit.scale).into(),
                ],
            ),
            Operation::new("Td", vec![fit.x(*x).into(), fit.y(*y).into()]),
            Operation::new("Tj", vec![Object::string_literal(pdf_safe(text))]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ],
        Element::Rule {
            x,
            y,
            width,
            thickness,
        } => vec![
            Operation::new("q", vec![]),
            Operation::new("G", vec![0.8f32.into()]),
            Operation::new("w", vec![(thickness * fit.scale).into()]),
            Operation::new("m", vec![fit.x(*x).into(), fit.y(*y).into()]),
            Operation::new("l", vec![fit.x(x + width).into(), fit.y(*y).into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ],
        Element::Block {
            x,
            y,
            width,
            height,
            gray,
        } => vec![
            Operation::new("q", vec![]),
            Operation::new("g", vec![(*gray).into()]),
            Operation::new(
                "re",
                vec![
                    fit.x(*x).into(),
                    fit.y(y + height).into(),
                    (width * fit.scale).into(),
                    (height * fit.scale).into(),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ],
    }
}

/// The standard fonts only cover WinAnsi; keep to printable ASCII.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '×' => 'x',
            '–' | '—' => '-',
            '‘' | '’' => '\'',
            '“' | '”' => '"',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}

fn approx_text_width(text: &str, size: f32, bold: bool) -> f32 {
    let em = if bold { 0.56 } else { 0.52 };
    text.chars().count() as f32 * size * em
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog::Catalog;
    use crate::models::quote::EstimateId;
    use crate::models::selection::Selection;
    use crate::services::quote_service::QuoteService;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quote(ids: &[&str]) -> QuoteDocument {
        let catalog = Catalog::embedded().unwrap();
        let selection = Selection {
            service_ids: ids.iter().map(|id| id.to_string()).collect(),
            ..Default::default()
        };
        let estimate =
            PricingService::compute_estimate(&selection, &catalog.services, &catalog.pricing)
                .unwrap();
        QuoteService::render_quote_document(
            &selection,
            &estimate,
            &EstimateId::generate(&mut StdRng::seed_from_u64(3)),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            &catalog.services,
            &catalog.pricing,
            "hello@northwind.dev",
        )
        .unwrap()
    }

    #[test]
    fn test_short_layout_fits_width() {
        let fit = fit_to_page(LAYOUT_WIDTH, 600.0).unwrap();
        let available_width = A4_WIDTH_PT - 2.0 * PAGE_MARGIN_PT;
        assert!((fit.width - available_width).abs() < 1e-3);
        assert!((fit.origin_x - PAGE_MARGIN_PT).abs() < 1e-3);
        assert!(fit.height < A4_HEIGHT_PT - 2.0 * PAGE_MARGIN_PT);
    }

    #[test]
    fn test_tall_layout_is_constrained_by_height() {
        let fit = fit_to_page(LAYOUT_WIDTH, 4000.0).unwrap();
        let available_height = A4_HEIGHT_PT - 2.0 * PAGE_MARGIN_PT;
        assert!((fit.height - available_height).abs() < 1e-3);
        assert!(fit.width < A4_WIDTH_PT - 2.0 * PAGE_MARGIN_PT);
        // Aspect ratio preserved and horizontally centred.
        assert!((fit.width / fit.height - LAYOUT_WIDTH / 4000.0).abs() < 1e-4);
        let right_gap = A4_WIDTH_PT - (fit.origin_x + fit.width);
        assert!((right_gap - fit.origin_x).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_layout_is_an_error() {
        assert_eq!(fit_to_page(0.0, 100.0), Err(RenderError::EmptyLayout));
        assert_eq!(fit_to_page(800.0, f32::NAN), Err(RenderError::EmptyLayout));
        let empty = DocumentLayout {
            width: LAYOUT_WIDTH,
            height: 0.0,
            elements: vec![],
        };
        assert_eq!(PdfService::render_layout(&empty), Err(RenderError::EmptyLayout));
    }

    #[test]
    fn test_layout_contains_every_element() {
        let layout = DocumentLayout::for_quote(&quote(&[
            "web-development",
            "cloud-migration",
            "ai-ml-solutions",
        ]));
        assert_eq!(layout.width, LAYOUT_WIDTH);
        for element in &layout.elements {
            let y = match element {
                Element::Text { y, .. } | Element::Rule { y, .. } => *y,
                Element::Block { y, height, .. } => y + height,
            };
            assert!(y <= layout.height);
        }
        let texts: Vec<&str> = layout
            .elements
            .iter()
            .filter_map(|element| match element {
                Element::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Cloud Migration"));
        assert!(texts.contains(&"Estimated total"));
    }

    #[test]
    fn test_render_produces_single_page_pdf() {
        let bytes = PdfService::render_quote(&quote(&["web-development"])).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }

    #[test]
    fn test_wrap_and_sanitise() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert_eq!(pdf_safe("3 × 4 – ok ✓"), "3 x 4 - ok ?");
    }
}
