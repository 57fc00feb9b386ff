//! TOML configuration
//!
//! ```toml
//! [pixels]
//! quarter_width = 160
//!
//! [page]
//! label_width = 60
//!
//! [wrap]
//! title_chars = 32
//! ```
//!
//! Every table and key is optional; anything left out keeps the renderer
//! default for that unit system.

use anyhow::{bail, Context, Result};
use qgantt_render::{LayoutMetrics, WrapMetrics};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Overrides for SVG and PNG
    pub pixels: MetricsOverride,
    /// Overrides for PDF
    pub page: MetricsOverride,
    pub wrap: WrapMetrics,
}

/// Per-key overrides applied on top of a base [`LayoutMetrics`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsOverride {
    pub header_height: Option<f32>,
    pub row_height: Option<f32>,
    pub quarter_width: Option<f32>,
    pub label_width: Option<f32>,
    pub padding: Option<f32>,
    pub category_header_height: Option<f32>,
    pub bar_inset_x: Option<f32>,
    pub bar_inset_y: Option<f32>,
}

impl MetricsOverride {
    /// Check every set key. Sizes must be positive; offsets may be zero.
    fn validate(&self, table: &str) -> Result<()> {
        let sizes = [
            ("row_height", self.row_height),
            ("quarter_width", self.quarter_width),
            ("label_width", self.label_width),
            ("category_header_height", self.category_header_height),
        ];
        for (key, value) in sizes {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    bail!("[{}] {} must be a positive number, got {}", table, key, value);
                }
            }
        }

        let offsets = [
            ("header_height", self.header_height),
            ("padding", self.padding),
            ("bar_inset_x", self.bar_inset_x),
            ("bar_inset_y", self.bar_inset_y),
        ];
        for (key, value) in offsets {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    bail!("[{}] {} must be zero or positive, got {}", table, key, value);
                }
            }
        }
        Ok(())
    }

    pub fn apply(&self, base: LayoutMetrics) -> LayoutMetrics {
        LayoutMetrics {
            header_height: self.header_height.unwrap_or(base.header_height),
            row_height: self.row_height.unwrap_or(base.row_height),
            quarter_width: self.quarter_width.unwrap_or(base.quarter_width),
            label_width: self.label_width.unwrap_or(base.label_width),
            padding: self.padding.unwrap_or(base.padding),
            category_header_height: self
                .category_header_height
                .unwrap_or(base.category_header_height),
            bar_inset_x: self.bar_inset_x.unwrap_or(base.bar_inset_x),
            bar_inset_y: self.bar_inset_y.unwrap_or(base.bar_inset_y),
        }
    }
}

impl Config {
    /// Load `path`, or the defaults when no file was given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.pixels.validate("pixels")?;
        config.page.validate("page")?;

        let wrap = &config.wrap;
        let line_heights = [
            ("title_line_height", wrap.title_line_height),
            ("description_line_height", wrap.description_line_height),
            ("row_padding", wrap.row_padding),
            ("category_line_height", wrap.category_line_height),
            ("min_bar_height", wrap.min_bar_height),
        ];
        for (key, value) in line_heights {
            if !value.is_finite() || value < 0.0 {
                bail!("[wrap] {} must be zero or positive, got {}", key, value);
            }
        }
        Ok(config)
    }

    pub fn pixel_metrics(&self) -> LayoutMetrics {
        self.pixels.apply(LayoutMetrics::pixels())
    }

    pub fn page_metrics(&self) -> LayoutMetrics {
        self.page.apply(LayoutMetrics::page())
    }
}
