//! PNG chart renderer
//!
//! Draws the fixed-height layout into an RGBA bitmap. Only geometry is
//! drawn: there is no font rasterizer, so labels are left out of the bitmap.
//! Bars are plain rectangles; corner rounding is not rasterized.

use crate::layout::{ChartLayout, LayoutMetrics, RowPolicy};
use image::{ImageFormat, Rgba, RgbaImage};
use qgantt_core::{Chart, RenderError, Renderer, Rgb};
use std::io::Cursor;
use tracing::debug;

/// Height of the quarter label band above the first row
const QUARTER_BAND_HEIGHT: f32 = 30.0;

/// Largest canvas edge, in pixels, the renderer will allocate
pub const MAX_DIMENSION: u32 = 16_384;

/// PNG renderer configuration
#[derive(Clone, Debug)]
pub struct PngRenderer {
    /// Geometry in pixels
    pub metrics: LayoutMetrics,
    pub background: Rgb,
    /// Quarter header fills, alternating
    pub band_colors: [Rgb; 2],
    pub band_border: Rgb,
    pub grid_color: Rgb,
    pub label_background: Rgb,
    pub category_opacity: f32,
    pub category_band_opacity: f32,
    pub bar_opacity: f32,
    /// Canvases wider or taller than this fail to render
    pub max_dimension: u32,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self {
            metrics: LayoutMetrics::pixels(),
            background: Rgb::new(250, 250, 250),
            band_colors: [Rgb::new(232, 232, 232), Rgb::new(245, 245, 245)],
            band_border: Rgb::new(204, 204, 204),
            grid_color: Rgb::new(221, 221, 221),
            label_background: Rgb::new(255, 255, 255),
            category_opacity: 0.3,
            category_band_opacity: 0.05,
            bar_opacity: 0.8,
            max_dimension: MAX_DIMENSION,
        }
    }
}

impl PngRenderer {
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

    /// Draw the chart without encoding it
    pub fn rasterize(&self, chart: &Chart) -> Result<RgbaImage, RenderError> {
        let layout = self.layout(chart);
        let m = &layout.metrics;
        let (width, height) = canvas_size(&layout);
        if width > self.max_dimension || height > self.max_dimension {
            return Err(RenderError::Encode(format!(
                "Canvas {}x{} exceeds the {} pixel limit",
                width, height, self.max_dimension
            )));
        }
        let mut canvas = Canvas::new(width, height, self.background);

        let band_top = px(m.header_height - QUARTER_BAND_HEIGHT);
        for (i, x, _) in layout.columns_iter() {
            let (x, width) = (px(x), px(m.quarter_width));
            let band_height = px(QUARTER_BAND_HEIGHT);
            canvas.fill_rect(x, band_top, width, band_height, self.band_colors[i % 2], 1.0);
            canvas.stroke_rect(x, band_top, width, band_height, self.band_border);
            canvas.vertical_line(x, px(m.header_height), px(layout.grid_bottom()), self.grid_color);
        }

        let label_x = px(m.padding);
        let label_width = px(m.label_width);
        for category in &layout.categories {
            let (y, height) = (px(category.y), px(category.height));
            canvas.fill_rect(label_x, y, label_width, height, category.color, self.category_opacity);
            canvas.fill_rect(
                px(m.padding + m.label_width),
                y,
                px(layout.timeline_width()),
                height,
                category.color,
                self.category_band_opacity,
            );

            for task in &category.tasks {
                let (y, height) = (px(task.y), px(task.height));
                canvas.fill_rect(label_x, y, label_width, height, self.label_background, 1.0);
                canvas.stroke_rect(label_x, y, label_width, height, self.grid_color);

                if let Some(bar) = task.bar {
                    canvas.fill_rounded_rect(
                        px(bar.x),
                        px(bar.y),
                        px(bar.width),
                        px(bar.height),
                        4,
                        task.color,
                        self.bar_opacity,
                    );
                }
            }
        }

        Ok(canvas.image)
    }
}

impl Renderer for PngRenderer {
    type Output = Vec<u8>;

    fn render(&self, chart: &Chart) -> Result<Vec<u8>, RenderError> {
        let image = self.rasterize(chart)?;
        debug!(width = image.width(), height = image.height(), "rendering png");

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| RenderError::Encode(format!("Failed to write PNG: {}", e)))?;

        debug!(bytes = bytes.len(), "png rendered");
        Ok(bytes)
    }
}

/// Snap a layout coordinate to the pixel grid
fn px(value: f32) -> i32 {
    value.round() as i32
}

/// Pixel size of the layout; negative extents collapse to zero
fn canvas_size(layout: &ChartLayout<'_>) -> (u32, u32) {
    (px(layout.width).max(0) as u32, px(layout.height).max(0) as u32)
}

/// An opaque RGBA bitmap with clipped drawing primitives
struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([background.r, background.g, background.b, 255])),
        }
    }

    /// Composite `color` at `opacity` onto one pixel; off-canvas is ignored
    fn blend(&mut self, x: i32, y: i32, color: Rgb, opacity: f32) {
        if x < 0 || y < 0 || x as u32 >= self.image.width() || y as u32 >= self.image.height() {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        let [r, g, b, _] = pixel.0;
        let out = color.over(Rgb::new(r, g, b), opacity);
        *pixel = Rgba([out.r, out.g, out.b, 255]);
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb, opacity: f32) {
        for i in x..x + width {
            for j in y..y + height {
                self.blend(i, j, color, opacity);
            }
        }
    }

    /// Four one-pixel edges; bottom and right sit at `y + height` and `x + width`
    fn stroke_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb) {
        for i in x..x + width {
            self.blend(i, y, color, 1.0);
            self.blend(i, y + height, color, 1.0);
        }
        for j in y..y + height {
            self.blend(x, j, color, 1.0);
            self.blend(x + width, j, color, 1.0);
        }
    }

    /// Inclusive of both ends
    fn vertical_line(&mut self, x: i32, y1: i32, y2: i32, color: Rgb) {
        for j in y1..=y2 {
            self.blend(x, j, color, 1.0);
        }
    }

    /// Drawn as a plain rectangle; `_radius` is accepted for parity with the
    /// SVG output
    fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        _radius: i32,
        color: Rgb,
        opacity: f32,
    ) {
        self.fill_rect(x, y, width, height, color, opacity);
    }
}
