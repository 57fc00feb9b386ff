//! SVG chart renderer
//!
//! Uses the wrapped row policy: titles, descriptions and long category names
//! wrap onto several lines and rows grow to fit them.

use crate::layout::{CategoryRow, ChartLayout, LayoutMetrics, RowPolicy, TaskRow, WrapMetrics};
use qgantt_core::{Chart, RenderError, Renderer};
use svg::node::element::{Definitions, Element, Group, Line, Rectangle, Style, Text};
use svg::node::Blob;
use svg::{Document, Node};
use tracing::debug;

/// Height of the quarter label band above the first row
const QUARTER_BAND_HEIGHT: f32 = 30.0;

const STYLESHEET: &str = ".title{font:bold 20px sans-serif;fill:#333}\
.header{font:bold 12px sans-serif;fill:#555}\
.label{font:12px sans-serif;fill:#333}\
.category{font:bold 14px sans-serif;fill:#222}\
.desc{font:10px sans-serif;fill:#666}";

/// SVG renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Geometry in pixels
    pub metrics: LayoutMetrics,
    /// Wrapping widths and line heights
    pub wrap: WrapMetrics,
    /// Canvas background
    pub background_color: String,
    /// Quarter header fills, alternating
    pub band_colors: [String; 2],
    /// Grid line color
    pub grid_color: String,
    /// Bar fill opacity
    pub bar_opacity: f32,
    /// Outline color factor relative to the bar fill
    pub outline_darken: f32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            metrics: LayoutMetrics::pixels(),
            wrap: WrapMetrics::default(),
            background_color: "#fafafa".into(),
            band_colors: ["#e8e8e8".into(), "#f5f5f5".into()],
            grid_color: "#ddd".into(),
            bar_opacity: 0.8,
            outline_darken: 0.7,
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure layout metrics
    pub fn metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Configure text wrapping
    pub fn wrap(mut self, wrap: WrapMetrics) -> Self {
        self.wrap = wrap;
        self
    }

    /// Compute the layout this renderer draws
    pub fn layout<'a>(&self, chart: &'a Chart) -> ChartLayout<'a> {
        ChartLayout::compute(chart, self.metrics, RowPolicy::Wrapped(self.wrap))
    }

    /// Quarter header cells, labels and full-height grid lines
    fn render_header(&self, layout: &ChartLayout<'_>) -> Group {
        let mut group = Group::new().set("class", "quarters");
        let m = &layout.metrics;
        let band_top = m.header_height - QUARTER_BAND_HEIGHT;

        for (i, x, quarter) in layout.columns_iter() {
            let cell = Rectangle::new()
                .set("x", x)
                .set("y", band_top)
                .set("width", m.quarter_width)
                .set("height", QUARTER_BAND_HEIGHT)
                .set("fill", self.band_colors[i % 2].as_str())
                .set("stroke", "#ccc")
                .set("stroke-width", 1);
            group = group.add(cell);

            let label = Text::new(quarter.to_string())
                .set("x", x + m.quarter_width / 2.0)
                .set("y", m.header_height - 10.0)
                .set("class", "header")
                .set("text-anchor", "middle");
            group = group.add(label);

            let line = Line::new()
                .set("x1", x)
                .set("y1", m.header_height)
                .set("x2", x)
                .set("y2", layout.grid_bottom())
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        group
    }

    /// Category header band, name and the faint band across the timeline
    fn render_category(&self, layout: &ChartLayout<'_>, row: &CategoryRow<'_>) -> Group {
        let mut group = Group::new().set("class", "category");
        let m = &layout.metrics;
        let color = row.color.to_hex();

        let header = Rectangle::new()
            .set("x", m.padding)
            .set("y", row.y)
            .set("width", m.label_width)
            .set("height", row.height)
            .set("fill", color.as_str())
            .set("opacity", 0.3);
        group = group.add(header);

        let text_x = m.padding + 10.0;
        if row.name_lines.len() <= 1 {
            let name = escaped_text(&row.category.name)
                .set("x", text_x)
                .set("y", row.y + 22.0)
                .set("class", "category");
            group = group.add(name);
        } else {
            let name = multiline(
                Text::new("").set("x", text_x).set("y", row.y + 18.0).set("class", "category"),
                text_x,
                &row.name_lines,
                4.0,
                self.wrap.category_line_height,
            );
            group = group.add(name);
        }

        let band = Rectangle::new()
            .set("x", m.padding + m.label_width)
            .set("y", row.y)
            .set("width", layout.timeline_width())
            .set("height", row.height)
            .set("fill", color.as_str())
            .set("opacity", 0.05);
        group.add(band)
    }

    /// Label cell with wrapped text plus the bar when the span resolves
    fn render_task(&self, layout: &ChartLayout<'_>, row: &TaskRow<'_>) -> Group {
        let mut group = Group::new().set("class", "task");
        let m = &layout.metrics;

        let cell = Rectangle::new()
            .set("x", m.padding)
            .set("y", row.y)
            .set("width", m.label_width)
            .set("height", row.height)
            .set("fill", "#fff")
            .set("stroke", self.grid_color.as_str())
            .set("stroke-width", 1);
        group = group.add(cell);

        let text_x = m.padding + 10.0;
        let mut text_y = row.y + 14.0;
        if !row.title_lines.is_empty() {
            let title = multiline(
                Text::new("").set("x", text_x).set("y", text_y).set("class", "label"),
                text_x,
                &row.title_lines,
                0.0,
                self.wrap.title_line_height,
            );
            group = group.add(title);
            text_y += row.title_lines.len() as f32 * self.wrap.title_line_height;
        }
        if !row.description_lines.is_empty() {
            let description = multiline(
                Text::new("").set("x", text_x).set("y", text_y + 4.0).set("class", "desc"),
                text_x,
                &row.description_lines,
                0.0,
                self.wrap.description_line_height,
            );
            group = group.add(description);
        }

        if let Some(bar) = row.bar {
            let fill = Rectangle::new()
                .set("x", bar.x)
                .set("y", bar.y)
                .set("width", bar.width)
                .set("height", bar.height)
                .set("fill", row.color.to_hex())
                .set("rx", 4)
                .set("opacity", self.bar_opacity);
            group = group.add(fill);

            let outline = Rectangle::new()
                .set("x", bar.x)
                .set("y", bar.y)
                .set("width", bar.width)
                .set("height", bar.height)
                .set("fill", "none")
                .set("stroke", row.color.darken(self.outline_darken).to_hex())
                .set("stroke-width", 2)
                .set("rx", 4);
            group = group.add(outline);
        }

        group
    }
}

/// Escape markup-reserved characters in free text
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `<text>` holding `content` escaped once
fn escaped_text(content: &str) -> Text {
    Text::new("").add(Blob::new(escape(content)))
}

/// Append one `<tspan>` per line. The first line moves by `first_dy`, the
/// rest by `line_height`.
fn multiline(mut text: Text, x: f32, lines: &[String], first_dy: f32, line_height: f32) -> Text {
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { first_dy } else { line_height };
        let mut span = Element::new("tspan");
        span.assign("x", x);
        span.assign("dy", dy);
        span.append(Blob::new(escape(line)));
        text = text.add(span);
    }
    text
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, chart: &Chart) -> Result<String, RenderError> {
        let layout = self.layout(chart);
        debug!(
            columns = layout.columns(),
            width = layout.width,
            height = layout.height,
            "rendering svg"
        );

        let mut document = Document::new()
            .set("width", layout.width)
            .set("height", layout.height)
            .set("viewBox", (0.0, 0.0, layout.width, layout.height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(Definitions::new().add(Style::new(STYLESHEET)));

        let background = Rectangle::new()
            .set("width", layout.width)
            .set("height", layout.height)
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        let title = escaped_text(&chart.title)
            .set("x", layout.metrics.padding)
            .set("y", layout.metrics.padding + 20.0)
            .set("class", "title");
        document = document.add(title);

        document = document.add(self.render_header(&layout));

        for category in &layout.categories {
            document = document.add(self.render_category(&layout, category));
            for task in &category.tasks {
                document = document.add(self.render_task(&layout, task));
            }
        }

        let mut output = Vec::new();
        svg::write(&mut output, &document)?;
        let svg = String::from_utf8(output)
            .map_err(|e| RenderError::Encode(format!("Invalid UTF-8: {}", e)))?;

        debug!(bytes = svg.len(), "svg rendered");
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgantt_core::{Category, Quarter, Task};

    fn q(year: i32, quarter: u8) -> Quarter {
        Quarter::new(year, quarter)
    }

    fn chart() -> Chart {
        Chart::new("Platform Roadmap")
            .span(q(2024, 1), q(2024, 4))
            .category(
                Category::new("eng", "Eng")
                    .color("#3366FF")
                    .task(
                        Task::new("t1", "Design")
                            .description("Architecture and API review")
                            .span(q(2024, 1), q(2024, 2)),
                    ),
            )
    }

    #[test]
    fn svg_renderer_defaults() {
        let renderer = SvgRenderer::new();
        assert_eq!(renderer.metrics, LayoutMetrics::pixels());
        assert_eq!(renderer.wrap, WrapMetrics::default());
    }

    #[test]
    fn svg_render_produces_document() {
        let svg = SvgRenderer::new().render(&chart()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<style>"));
        assert!(svg.contains("Platform Roadmap"));
        assert!(svg.contains("Design"));
        assert!(svg.contains("Q1 2024"));
        assert!(svg.contains("Q4 2024"));
    }

    #[test]
    fn svg_uses_resolved_colors() {
        let svg = SvgRenderer::new().render(&chart()).unwrap();
        assert!(svg.contains("#3366ff"));
        // Darkened outline
        assert!(svg.contains(&qgantt_core::Rgb::new(0x33, 0x66, 0xff).darken(0.7).to_hex()));
    }

    #[test]
    fn svg_empty_category_color_uses_default() {
        let chart = Chart::new("Defaults")
            .span(q(2024, 1), q(2024, 1))
            .category(Category::new("c", "Ops").task(Task::new("t", "Run").span(q(2024, 1), q(2024, 1))));
        let svg = SvgRenderer::new().render(&chart).unwrap();
        assert!(svg.contains("#6495ed"));
    }

    #[test]
    fn escape_covers_reserved_characters() {
        assert_eq!(escape(r#"a & <b> "c""#), "a &amp; &lt;b&gt; &quot;c&quot;");
        assert_eq!(escape("&amp;"), "&amp;amp;");
        assert_eq!(escape("plain 'text'"), "plain 'text'");
    }

    #[test]
    fn svg_escapes_quotes_once() {
        let chart = Chart::new(r#"He said "hi" & 'bye'"#)
            .span(q(2024, 1), q(2024, 1))
            .category(
                Category::new("c", r#"The "core" team"#).task(
                    Task::new("t", r#"T "x""#)
                        .description(r#"d <"y">"#)
                        .span(q(2024, 1), q(2024, 1)),
                ),
            );
        let svg = SvgRenderer::new().render(&chart).unwrap();
        assert!(svg.contains("He said &quot;hi&quot; &amp; 'bye'"));
        assert!(svg.contains("The &quot;core&quot; team"));
        assert!(svg.contains("T &quot;x&quot;"));
        assert!(svg.contains("d &lt;&quot;y&quot;&gt;"));
        assert!(!svg.contains("\"hi\""));
        assert!(!svg.contains("&amp;quot;"));
        assert!(!svg.contains("&amp;amp;"));
    }

    #[test]
    fn svg_multiline_category_uses_tspans() {
        let chart = Chart::new("Wrap").span(q(2024, 1), q(2024, 1)).category(Category::new(
            "c",
            "Infrastructure and developer productivity platform",
        ));
        let svg = SvgRenderer::new().render(&chart).unwrap();
        assert!(svg.contains("<tspan"));
        assert!(svg.contains("Infrastructure and developer"));
    }
}
