//! # qgantt-core
//!
//! Core domain model and helpers for quarterly roadmap Gantt charts.
//!
//! This crate provides:
//! - Domain types: `Chart`, `Category`, `Task`, `Quarter`
//! - The quarter timeline (`timeline`), lenient color parsing (`color`) and
//!   text wrapping / truncation (`text`)
//! - The `Renderer` trait and `RenderError` shared by every output format
//!
//! ## Example
//!
//! ```rust
//! use qgantt_core::{Category, Chart, Quarter, Task};
//!
//! let chart = Chart::new("Roadmap 2024")
//!     .span(Quarter::new(2024, 1), Quarter::new(2024, 4))
//!     .category(
//!         Category::new("eng", "Engineering")
//!             .color("#3366FF")
//!             .task(Task::new("design", "Design").span(Quarter::new(2024, 1), Quarter::new(2024, 2))),
//!     );
//! assert_eq!(chart.timeline().len(), 4);
//! ```

pub mod color;
pub mod text;
pub mod timeline;

pub use color::{parse_color, Rgb};
pub use text::{truncate, wrap};
pub use timeline::{calculate_quarters, find_quarter_index, Timeline};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Quarter
// ============================================================================

/// A calendar quarter, `quarter` is 1 through 4
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u8,
}

impl Quarter {
    pub const fn new(year: i32, quarter: u8) -> Self {
        Self { year, quarter }
    }

    /// Position on a continuous quarter axis (`year * 4 + quarter`)
    pub const fn ordinal(&self) -> i64 {
        self.year as i64 * 4 + self.quarter as i64
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.quarter, self.year)
    }
}

// ============================================================================
// Chart
// ============================================================================

/// A roadmap chart: a title, a quarter range and ordered categories
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Chart {
    pub id: String,
    pub title: String,
    pub start_year: i32,
    pub start_quarter: u8,
    pub end_year: i32,
    pub end_quarter: u8,
    pub categories: Vec<Category>,
    /// Bookkeeping timestamps written by chart stores; ignored when rendering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Chart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the chart identifier
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the inclusive quarter range shown on the timeline
    pub fn span(mut self, start: Quarter, end: Quarter) -> Self {
        self.start_year = start.year;
        self.start_quarter = start.quarter;
        self.end_year = end.year;
        self.end_quarter = end.quarter;
        self
    }

    /// Append a category
    pub fn category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub const fn start(&self) -> Quarter {
        Quarter::new(self.start_year, self.start_quarter)
    }

    pub const fn end(&self) -> Quarter {
        Quarter::new(self.end_year, self.end_quarter)
    }

    /// The quarter columns covered by this chart
    pub fn timeline(&self) -> Timeline {
        Timeline::for_chart(self)
    }

    /// Total number of tasks across all categories
    pub fn task_count(&self) -> usize {
        self.categories.iter().map(|c| c.tasks.len()).sum()
    }
}

// ============================================================================
// Category
// ============================================================================

/// A named, colored group of tasks
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Hex color such as `#3366FF`; may be empty
    pub color: String,
    pub tasks: Vec<Task>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Append a task
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }
}

// ============================================================================
// Task
// ============================================================================

/// A single bar on the chart
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_year: i32,
    pub start_quarter: u8,
    pub end_year: i32,
    pub end_quarter: u8,
    /// Color override; empty means "use the category color"
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color: String,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the inclusive quarter range the task occupies
    pub fn span(mut self, start: Quarter, end: Quarter) -> Self {
        self.start_year = start.year;
        self.start_quarter = start.quarter;
        self.end_year = end.year;
        self.end_quarter = end.quarter;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub const fn start(&self) -> Quarter {
        Quarter::new(self.start_year, self.start_quarter)
    }

    pub const fn end(&self) -> Quarter {
        Quarter::new(self.end_year, self.end_quarter)
    }

    /// The color string to draw this task with, inheriting from `category`
    /// when the task has no override
    pub fn effective_color<'a>(&'a self, category: &'a Category) -> &'a str {
        if self.color.is_empty() {
            &category.color
        } else {
            &self.color
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Trait for chart output formats
pub trait Renderer {
    type Output;

    /// Render a chart to the output format
    fn render(&self, chart: &Chart) -> Result<Self::Output, RenderError>;
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The image or document library failed to serialize the output
    #[error("Encoding error: {0}")]
    Encode(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_chart() -> Chart {
        Chart::new("Roadmap")
            .id("c1")
            .span(Quarter::new(2024, 1), Quarter::new(2024, 4))
            .category(
                Category::new("eng", "Eng")
                    .color("#3366FF")
                    .task(
                        Task::new("t1", "Design")
                            .description("System design")
                            .span(Quarter::new(2024, 1), Quarter::new(2024, 2)),
                    )
                    .task(Task::new("t2", "Build").color("#FF0000")),
            )
    }

    #[test]
    fn quarter_display_and_ordinal() {
        let q = Quarter::new(2024, 3);
        assert_eq!(q.to_string(), "Q3 2024");
        assert_eq!(q.ordinal(), 2024 * 4 + 3);
        assert!(Quarter::new(2023, 4) < Quarter::new(2024, 1));
    }

    #[test]
    fn builder_sets_ranges() {
        let chart = sample_chart();
        assert_eq!(chart.start(), Quarter::new(2024, 1));
        assert_eq!(chart.end(), Quarter::new(2024, 4));
        assert_eq!(chart.categories[0].tasks[0].end(), Quarter::new(2024, 2));
        assert_eq!(chart.task_count(), 2);
    }

    #[test]
    fn task_color_inherits_from_category() {
        let chart = sample_chart();
        let category = &chart.categories[0];
        assert_eq!(category.tasks[0].effective_color(category), "#3366FF");
        assert_eq!(category.tasks[1].effective_color(category), "#FF0000");
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let chart = sample_chart();
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["startYear"], 2024);
        assert_eq!(json["endQuarter"], 4);
        assert_eq!(json["categories"][0]["tasks"][0]["startQuarter"], 1);
        // Empty task color is omitted
        assert!(json["categories"][0]["tasks"][0].get("color").is_none());
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn json_missing_fields_default() {
        let chart: Chart = serde_json::from_str(
            r#"{"title":"Sparse","startYear":2025,"startQuarter":2,"endYear":2025,"endQuarter":3,
                "categories":[{"name":"Ops","tasks":[{"title":"Migrate"}]}]}"#,
        )
        .unwrap();
        assert_eq!(chart.id, "");
        assert_eq!(chart.categories[0].color, "");
        assert_eq!(chart.categories[0].tasks[0].description, "");
        assert_eq!(chart.timeline().len(), 2);
    }

    #[test]
    fn json_accepts_store_timestamps() {
        let chart: Chart = serde_json::from_str(
            r#"{"id":"abc","title":"T","startYear":2024,"startQuarter":1,"endYear":2024,"endQuarter":1,
                "categories":[],"createdAt":"2024-05-01T10:00:00Z","updatedAt":"0001-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(chart.created_at.is_some());
        assert!(chart.updated_at.is_some());
    }

    #[test]
    fn render_error_messages() {
        let err = RenderError::Encode("png failed".into());
        assert_eq!(err.to_string(), "Encoding error: png failed");
    }
}
