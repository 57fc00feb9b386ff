//! PDF chart renderer
//!
//! Single A4 landscape page in millimeters, fixed-height rows, titles
//! truncated instead of wrapped. Content that does not fit on the page is
//! cut off by the page edge.

use crate::layout::{ChartLayout, LayoutMetrics, RowPolicy};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb as PdfRgb,
};
use qgantt_core::{truncate, Chart, RenderError, Renderer, Rgb};
use tracing::debug;

/// Points to millimeters
const PT_TO_MM: f32 = 0.352_778;

/// Height of the quarter label band above the first row
const QUARTER_BAND_HEIGHT: f32 = 8.0;

/// PDF renderer configuration
#[derive(Clone, Debug)]
pub struct PdfRenderer {
    /// Geometry in millimeters
    pub metrics: LayoutMetrics,
    pub page_width: f32,
    pub page_height: f32,
    /// Longest task title drawn before truncation
    pub task_title_chars: usize,
    /// Longest category name drawn before truncation
    pub category_name_chars: usize,
    /// Quarter header fills, alternating
    pub band_colors: [Rgb; 2],
    pub border_color: Rgb,
    pub text_color: Rgb,
    pub category_opacity: f32,
    pub bar_opacity: f32,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            metrics: LayoutMetrics::page(),
            page_width: 297.0,
            page_height: 210.0,
            task_title_chars: 20,
            category_name_chars: 28,
            band_colors: [Rgb::new(232, 232, 232), Rgb::new(245, 245, 245)],
            border_color: Rgb::new(221, 221, 221),
            text_color: Rgb::new(0, 0, 0),
            category_opacity: 0.3,
            bar_opacity: 0.8,
        }
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure layout metrics
    pub fn metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Compute the layout this renderer draws
    pub fn layout<'a>(&self, chart: &'a Chart) -> ChartLayout<'a> {
        ChartLayout::compute(chart, self.metrics, RowPolicy::Fixed)
    }
}

/// Fonts registered with the document
struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Drawing surface in top-left-origin millimeters.
///
/// Opacity is a parameter of each fill; translucent fills are composited
/// against the white page so nothing leaks into later shapes.
struct Page {
    layer: PdfLayerReference,
    height: f32,
    paper: Rgb,
}

impl Page {
    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: Rgb, opacity: f32) {
        self.layer.set_fill_color(pdf_color(color.over(self.paper, opacity)));
        self.layer.add_rect(self.rect(x, y, width, height).with_mode(PaintMode::Fill));
    }

    fn stroke_rect(&self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(0.6);
        self.layer.add_rect(self.rect(x, y, width, height).with_mode(PaintMode::Stroke));
    }

    /// Text vertically centered in a cell of `cell_height` starting at `top`,
    /// with a 1mm left margin
    fn text(&self, text: &str, size: f32, x: f32, top: f32, cell_height: f32, color: Rgb, font: &IndirectFontRef) {
        if text.is_empty() {
            return;
        }
        let baseline = top + cell_height / 2.0 + size * PT_TO_MM * 0.35;
        self.layer.set_fill_color(pdf_color(color));
        self.layer
            .use_text(text, size, Mm(x + 1.0), Mm(self.height - baseline), font);
    }

    fn rect(&self, x: f32, y: f32, width: f32, height: f32) -> Rect {
        let (lower, upper) = flip_span(self.height, y, height);
        Rect::new(Mm(x), Mm(lower), Mm(x + width), Mm(upper))
    }
}

/// Convert a top-down span `[y, y + height]` to PDF's bottom-up axis
fn flip_span(page_height: f32, y: f32, height: f32) -> (f32, f32) {
    (page_height - (y + height), page_height - y)
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        None,
    ))
}

impl Renderer for PdfRenderer {
    type Output = Vec<u8>;

    fn render(&self, chart: &Chart) -> Result<Vec<u8>, RenderError> {
        let layout = self.layout(chart);
        debug!(
            columns = layout.columns(),
            width_mm = layout.width,
            height_mm = layout.height,
            "rendering pdf"
        );

        let (doc, page_index, layer_index) = PdfDocument::new(
            chart.title.as_str(),
            Mm(self.page_width),
            Mm(self.page_height),
            "Chart",
        );
        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| RenderError::Encode(format!("Failed to load font: {}", e)))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| RenderError::Encode(format!("Failed to load font: {}", e)))?,
        };
        let page = Page {
            layer: doc.get_page(page_index).get_layer(layer_index),
            height: self.page_height,
            paper: Rgb::new(255, 255, 255),
        };
        let m = &layout.metrics;

        page.text(&chart.title, 16.0, m.padding, m.padding, 10.0, self.text_color, &fonts.bold);

        let band_top = m.header_height - QUARTER_BAND_HEIGHT;
        for (i, x, quarter) in layout.columns_iter() {
            page.fill_rect(x, band_top, m.quarter_width, QUARTER_BAND_HEIGHT, self.band_colors[i % 2], 1.0);
            page.text(
                &quarter.to_string(),
                9.0,
                x,
                band_top + 1.0,
                6.0,
                self.text_color,
                &fonts.bold,
            );
        }

        for category in &layout.categories {
            page.fill_rect(
                m.padding,
                category.y,
                m.label_width,
                category.height,
                category.color,
                self.category_opacity,
            );
            page.text(
                &truncate(&category.category.name, self.category_name_chars),
                9.0,
                m.padding + 2.0,
                category.y + 2.0,
                category.height - 4.0,
                self.text_color,
                &fonts.bold,
            );

            for task in &category.tasks {
                page.stroke_rect(m.padding, task.y, m.label_width, task.height, self.border_color);
                page.text(
                    &truncate(&task.task.title, self.task_title_chars),
                    8.0,
                    m.padding + 2.0,
                    task.y + 2.0,
                    4.0,
                    self.text_color,
                    &fonts.regular,
                );

                if let Some(bar) = task.bar {
                    page.fill_rect(bar.x, bar.y, bar.width, bar.height, task.color, self.bar_opacity);
                }
            }
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| RenderError::Encode(format!("Failed to write PDF: {}", e)))?;

        debug!(bytes = bytes.len(), "pdf rendered");
        Ok(bytes)
    }
}
