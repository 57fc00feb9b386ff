//! Shared chart geometry
//!
//! One layout engine serves all three encoders. Units are whatever the
//! metrics are expressed in: pixels for SVG/PNG, millimeters for PDF.
//!
//! Two row policies exist side by side:
//! - [`RowPolicy::Fixed`]: constant category header and task row heights
//! - [`RowPolicy::Wrapped`]: rows grow with the wrapped title, description
//!   and category name text

use qgantt_core::{parse_color, wrap, Category, Chart, Quarter, Rgb, Task, Timeline};
use serde::{Deserialize, Serialize};

/// Layout constants in output units
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Space above the first row (title and quarter header band)
    pub header_height: f32,
    /// Task row height (minimum height under the wrapped policy)
    pub row_height: f32,
    /// Width of one quarter column
    pub quarter_width: f32,
    /// Width of the label column on the left
    pub label_width: f32,
    /// Outer padding
    pub padding: f32,
    /// Category header height (single-line name)
    pub category_header_height: f32,
    /// Horizontal gap between a bar and its column edges
    pub bar_inset_x: f32,
    /// Vertical gap between a bar and its row edges
    pub bar_inset_y: f32,
}

impl LayoutMetrics {
    /// Screen metrics in pixels (SVG and PNG)
    pub const fn pixels() -> Self {
        Self {
            header_height: 80.0,
            row_height: 40.0,
            quarter_width: 120.0,
            label_width: 200.0,
            padding: 20.0,
            category_header_height: 35.0,
            bar_inset_x: 2.0,
            bar_inset_y: 8.0,
        }
    }

    /// Page metrics in millimeters (PDF)
    pub const fn page() -> Self {
        Self {
            header_height: 20.0,
            row_height: 10.0,
            quarter_width: 25.0,
            label_width: 50.0,
            padding: 10.0,
            category_header_height: 8.0,
            bar_inset_x: 1.0,
            bar_inset_y: 2.0,
        }
    }

    /// Left edge of timeline column `index`
    pub fn column_x(&self, index: usize) -> f32 {
        self.padding + self.label_width + index as f32 * self.quarter_width
    }

    /// Canvas width for a timeline of `columns` quarters
    pub fn canvas_width(&self, columns: usize) -> f32 {
        self.label_width + columns as f32 * self.quarter_width + self.padding * 2.0
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::pixels()
    }
}

/// Text metrics for the wrapped row policy
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapMetrics {
    pub title_chars: usize,
    pub title_line_height: f32,
    pub description_chars: usize,
    pub description_line_height: f32,
    /// Added to the text block height of every task row
    pub row_padding: f32,
    pub category_chars: usize,
    /// Added to the category header height for each name line after the first
    pub category_line_height: f32,
    /// Floor for bar height so short rows still show a bar
    pub min_bar_height: f32,
}

impl Default for WrapMetrics {
    fn default() -> Self {
        Self {
            title_chars: 28,
            title_line_height: 14.0,
            description_chars: 36,
            description_line_height: 12.0,
            row_padding: 8.0,
            category_chars: 30,
            category_line_height: 14.0,
            min_bar_height: 12.0,
        }
    }
}

/// How row heights are chosen
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowPolicy {
    /// Constant heights; text is left to the encoder (truncated)
    Fixed,
    /// Heights follow wrapped text
    Wrapped(WrapMetrics),
}

/// Where a task's bar lands
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BarGeometry {
    /// First timeline column covered
    pub start_index: usize,
    /// Last timeline column covered (inclusive)
    pub end_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A task row
#[derive(Clone, Debug, Serialize)]
pub struct TaskRow<'a> {
    #[serde(rename = "id", serialize_with = "task_id")]
    pub task: &'a Task,
    pub y: f32,
    pub height: f32,
    /// Wrapped title (wrapped policy only)
    pub title_lines: Vec<String>,
    /// Wrapped description (wrapped policy only)
    pub description_lines: Vec<String>,
    /// Resolved bar color, inherited from the category when unset
    pub color: Rgb,
    /// `None` when the task's quarters fall outside the timeline
    pub bar: Option<BarGeometry>,
}

/// A category header followed by its task rows
#[derive(Clone, Debug, Serialize)]
pub struct CategoryRow<'a> {
    #[serde(rename = "id", serialize_with = "category_id")]
    pub category: &'a Category,
    pub y: f32,
    pub height: f32,
    /// Wrapped name (wrapped policy only)
    pub name_lines: Vec<String>,
    pub color: Rgb,
    pub tasks: Vec<TaskRow<'a>>,
}

/// Complete geometry of one chart under one policy
#[derive(Clone, Debug, Serialize)]
pub struct ChartLayout<'a> {
    pub metrics: LayoutMetrics,
    pub policy: RowPolicy,
    pub timeline: Timeline,
    pub width: f32,
    pub height: f32,
    pub categories: Vec<CategoryRow<'a>>,
}

impl<'a> ChartLayout<'a> {
    /// Lay out `chart`. Pure: the chart is only read.
    pub fn compute(chart: &'a Chart, metrics: LayoutMetrics, policy: RowPolicy) -> Self {
        let timeline = chart.timeline();
        let mut y = metrics.header_height;
        let mut categories = Vec::with_capacity(chart.categories.len());

        for category in &chart.categories {
            let (name_lines, header_height) = category_header(category, &metrics, policy);
            let category_y = y;
            y += header_height;

            let mut tasks = Vec::with_capacity(category.tasks.len());
            for task in &category.tasks {
                let row = task_row(task, category, &timeline, &metrics, policy, y);
                y += row.height;
                tasks.push(row);
            }

            categories.push(CategoryRow {
                category,
                y: category_y,
                height: header_height,
                name_lines,
                color: parse_color(&category.color),
                tasks,
            });
        }

        let rows_height = y - metrics.header_height;

        Self {
            width: metrics.canvas_width(timeline.len()),
            height: metrics.header_height + rows_height + metrics.padding * 2.0,
            metrics,
            policy,
            timeline,
            categories,
        }
    }

    pub fn columns(&self) -> usize {
        self.timeline.len()
    }

    /// Column origins paired with their quarter
    pub fn columns_iter(&self) -> impl Iterator<Item = (usize, f32, Quarter)> + '_ {
        self.timeline
            .iter()
            .enumerate()
            .map(|(i, q)| (i, self.metrics.column_x(i), *q))
    }

    /// Width of the timeline area (all quarter columns)
    pub fn timeline_width(&self) -> f32 {
        self.columns() as f32 * self.metrics.quarter_width
    }

    /// Bottom edge of the grid lines
    pub fn grid_bottom(&self) -> f32 {
        self.height - self.metrics.padding
    }
}

fn category_header(
    category: &Category,
    metrics: &LayoutMetrics,
    policy: RowPolicy,
) -> (Vec<String>, f32) {
    match policy {
        RowPolicy::Fixed => (Vec::new(), metrics.category_header_height),
        RowPolicy::Wrapped(wrap_metrics) => {
            let lines = wrap(&category.name, wrap_metrics.category_chars);
            let extra_lines = lines.len().saturating_sub(1) as f32;
            let height = metrics.category_header_height + extra_lines * wrap_metrics.category_line_height;
            (lines, height)
        }
    }
}

fn task_row<'a>(
    task: &'a Task,
    category: &Category,
    timeline: &Timeline,
    metrics: &LayoutMetrics,
    policy: RowPolicy,
    y: f32,
) -> TaskRow<'a> {
    let (title_lines, description_lines, height, min_bar) = match policy {
        RowPolicy::Fixed => (Vec::new(), Vec::new(), metrics.row_height, None),
        RowPolicy::Wrapped(wrap_metrics) => {
            let title = wrap(&task.title, wrap_metrics.title_chars);
            let description = wrap(&task.description, wrap_metrics.description_chars);
            let text_height = title.len() as f32 * wrap_metrics.title_line_height
                + description.len() as f32 * wrap_metrics.description_line_height
                + wrap_metrics.row_padding;
            let height = metrics.row_height.max(text_height);
            (title, description, height, Some(wrap_metrics.min_bar_height))
        }
    };

    let bar = timeline.span_of(task).map(|(start_index, end_index)| {
        let span = (end_index - start_index + 1) as f32 * metrics.quarter_width;
        let mut bar_height = height - metrics.bar_inset_y * 2.0;
        if let Some(floor) = min_bar {
            bar_height = bar_height.max(floor);
        }
        BarGeometry {
            start_index,
            end_index,
            x: metrics.column_x(start_index) + metrics.bar_inset_x,
            y: y + metrics.bar_inset_y,
            width: span - metrics.bar_inset_x * 2.0,
            height: bar_height,
        }
    });

    TaskRow {
        task,
        y,
        height,
        title_lines,
        description_lines,
        color: parse_color(task.effective_color(category)),
        bar,
    }
}

fn task_id<S: serde::Serializer>(task: &&Task, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&task.id)
}

fn category_id<S: serde::Serializer>(
    category: &&Category,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&category.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qgantt_core::{Chart, Quarter};

    fn q(year: i32, quarter: u8) -> Quarter {
        Quarter::new(year, quarter)
    }

    fn sample() -> Chart {
        Chart::new("Roadmap")
            .span(q(2024, 1), q(2024, 4))
            .category(
                Category::new("eng", "Eng")
                    .color("#3366FF")
                    .task(Task::new("t1", "Design").span(q(2024, 1), q(2024, 2)))
                    .task(Task::new("t2", "Ship").span(q(2024, 4), q(2025, 1))),
            )
    }

    #[test]
    fn fixed_policy_dimensions() {
        let chart = sample();
        let layout = ChartLayout::compute(&chart, LayoutMetrics::pixels(), RowPolicy::Fixed);
        assert_eq!(layout.columns(), 4);
        assert_eq!(layout.width, 200.0 + 4.0 * 120.0 + 40.0);
        // header + padding*2 + one category header + two task rows
        assert_eq!(layout.height, 80.0 + 40.0 + 35.0 + 2.0 * 40.0);
    }

    #[test]
    fn rows_stack_from_header() {
        let chart = sample();
        let layout = ChartLayout::compute(&chart, LayoutMetrics::pixels(), RowPolicy::Fixed);
        let category = &layout.categories[0];
        assert_eq!(category.y, 80.0);
        assert_eq!(category.height, 35.0);
        assert_eq!(category.tasks[0].y, 115.0);
        assert_eq!(category.tasks[1].y, 155.0);
    }

    #[test]
    fn bar_covers_task_columns() {
        let chart = sample();
        let layout = ChartLayout::compute(&chart, LayoutMetrics::pixels(), RowPolicy::Fixed);
        let bar = layout.categories[0].tasks[0].bar.unwrap();
        assert_eq!((bar.start_index, bar.end_index), (0, 1));
        assert_eq!(bar.x, 20.0 + 200.0 + 2.0);
        assert_eq!(bar.width, 2.0 * 120.0 - 4.0);
        assert_eq!(bar.y, 115.0 + 8.0);
        assert_eq!(bar.height, 24.0);
    }

    #[test]
    fn out_of_range_task_has_no_bar() {
        let chart = sample();
        let layout = ChartLayout::compute(&chart, LayoutMetrics::pixels(), RowPolicy::Fixed);
        let row = &layout.categories[0].tasks[1];
        assert!(row.bar.is_none());
        // The label row is still laid out
        assert_eq!(row.height, 40.0);
    }

    #[test]
    fn task_inherits_category_color() {
        let chart = sample();
        let layout = ChartLayout::compute(&chart, LayoutMetrics::pixels(), RowPolicy::Fixed);
        assert_eq!(layout.categories[0].tasks[0].color, Rgb::new(0x33, 0x66, 0xff));
    }

    #[test]
    fn wrapped_rows_grow_with_text() {
        let chart = Chart::new("Wrap")
            .span(q(2024, 1), q(2024, 2))
            .category(
                Category::new("c", "A category name that is long enough to wrap twice")
                    .task(
                        Task::new("t", "A title that certainly needs two lines")
                            .description("And a description which is also rather long to fit")
                            .span(q(2024, 1), q(2024, 1)),
                    )
                    .task(Task::new("s", "Short")),
            );
        let layout = ChartLayout::compute(
            &chart,
            LayoutMetrics::pixels(),
            RowPolicy::Wrapped(WrapMetrics::default()),
        );
        let category = &layout.categories[0];
        assert_eq!(category.name_lines.len(), 2);
        assert_eq!(category.height, 35.0 + 14.0);

        let row = &category.tasks[0];
        assert_eq!(row.title_lines.len(), 2);
        assert_eq!(row.description_lines.len(), 2);
        assert_eq!(row.height, 2.0 * 14.0 + 2.0 * 12.0 + 8.0);
        assert_eq!(row.bar.unwrap().height, row.height - 16.0);

        // Short rows keep the base height
        assert_eq!(category.tasks[1].height, 40.0);
        assert_eq!(
            layout.height,
            80.0 + 40.0 + category.height + row.height + 40.0
        );
    }

    #[test]
    fn wrapped_policy_enforces_bar_floor() {
        let chart = Chart::new("Floor")
            .span(q(2024, 1), q(2024, 1))
            .category(Category::new("c", "C").task(Task::new("t", "T").span(q(2024, 1), q(2024, 1))));
        let metrics = LayoutMetrics {
            row_height: 20.0,
            ..LayoutMetrics::pixels()
        };
        let wrapped = ChartLayout::compute(&chart, metrics, RowPolicy::Wrapped(WrapMetrics::default()));
        let fixed = ChartLayout::compute(&chart, metrics, RowPolicy::Fixed);
        assert_eq!(wrapped.categories[0].tasks[0].bar.unwrap().height, 12.0);
        assert_eq!(fixed.categories[0].tasks[0].bar.unwrap().height, 4.0);
    }

    #[test]
    fn empty_timeline_for_reversed_chart() {
        let chart = Chart::new("Reversed").span(q(2025, 1), q(2024, 1));
        let layout = ChartLayout::compute(&chart, LayoutMetrics::page(), RowPolicy::Fixed);
        assert_eq!(layout.columns(), 0);
        assert_eq!(layout.width, 50.0 + 20.0);
        assert_eq!(layout.height, 20.0 + 20.0);
    }

    #[test]
    fn layout_serializes_ids() {
        let chart = sample();
        let layout = ChartLayout::compute(&chart, LayoutMetrics::pixels(), RowPolicy::Fixed);
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["policy"]["kind"], "fixed");
        assert_eq!(json["timeline"][1]["quarter"], 2);
        assert_eq!(json["categories"][0]["id"], "eng");
        assert_eq!(json["categories"][0]["tasks"][0]["id"], "t1");
        assert_eq!(json["categories"][0]["tasks"][0]["bar"]["end_index"], 1);
        assert!(json["categories"][0]["tasks"][1]["bar"].is_null());
    }
}
