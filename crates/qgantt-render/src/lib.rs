//! # qgantt-render
//!
//! Layout engine and output encoders for qgantt roadmap charts.
//!
//! This crate provides:
//! - A shared layout engine (`layout`) with fixed and wrapped row policies
//! - SVG output with wrapped multi-line labels (`SvgRenderer`)
//! - PNG output with fixed-height rows (`PngRenderer`)
//! - Single-page PDF output in millimeters with truncated labels (`PdfRenderer`)
//!
//! Every render call lays the chart out from scratch and touches nothing but
//! the chart it is given, so renders can run concurrently.
//!
//! ## Example
//!
//! ```rust
//! use qgantt_core::{Category, Chart, Quarter, Renderer, Task};
//! use qgantt_render::{render_raster, render_vector, SvgRenderer};
//!
//! let chart = Chart::new("Roadmap")
//!     .span(Quarter::new(2024, 1), Quarter::new(2024, 4))
//!     .category(
//!         Category::new("eng", "Eng")
//!             .color("#3366FF")
//!             .task(Task::new("design", "Design").span(Quarter::new(2024, 1), Quarter::new(2024, 2))),
//!     );
//!
//! let svg = render_vector(&chart)?;
//! assert!(svg.contains("Design"));
//!
//! let png = render_raster(&chart)?;
//! assert!(!png.is_empty());
//!
//! // Renderers can be configured before use
//! let svg = SvgRenderer::new().render(&chart)?;
//! # Ok::<(), qgantt_core::RenderError>(())
//! ```

pub mod document;
pub mod layout;
pub mod raster;
pub mod vector;

pub use document::PdfRenderer;
pub use layout::{
    BarGeometry, CategoryRow, ChartLayout, LayoutMetrics, RowPolicy, TaskRow, WrapMetrics,
};
pub use raster::PngRenderer;
pub use vector::SvgRenderer;

use qgantt_core::{Chart, RenderError, Renderer};

/// Render `chart` as an SVG document with the default configuration
pub fn render_vector(chart: &Chart) -> Result<String, RenderError> {
    SvgRenderer::default().render(chart)
}

/// Render `chart` as PNG bytes with the default configuration
pub fn render_raster(chart: &Chart) -> Result<Vec<u8>, RenderError> {
    PngRenderer::default().render(chart)
}

/// Render `chart` as a single-page PDF with the default configuration
pub fn render_document(chart: &Chart) -> Result<Vec<u8>, RenderError> {
    PdfRenderer::default().render(chart)
}
