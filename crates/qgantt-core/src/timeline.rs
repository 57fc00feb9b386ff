//! Quarter timeline
//!
//! The timeline is the ordered list of calendar quarters between a chart's
//! start and end (inclusive). Its length is the column count of every output
//! format, and task spans are mapped onto it by index.

use crate::{Chart, Quarter, Task};
use serde::Serialize;

/// Enumerate every quarter from `start` to `end` inclusive.
///
/// The first year begins at `start.quarter`, the last year stops at
/// `end.quarter`, every year in between contributes Q1 through Q4. An end
/// before the start yields an empty list.
pub fn calculate_quarters(start: Quarter, end: Quarter) -> Vec<Quarter> {
    let mut quarters = Vec::new();

    for year in start.year..=end.year {
        let first = if year == start.year { start.quarter } else { 1 };
        let last = if year == end.year { end.quarter } else { 4 };

        for quarter in first..=last {
            quarters.push(Quarter::new(year, quarter));
        }
    }

    quarters
}

/// Position of `(year, quarter)` in `quarters`, or `None` when absent
pub fn find_quarter_index(quarters: &[Quarter], year: i32, quarter: u8) -> Option<usize> {
    quarters
        .iter()
        .position(|q| q.year == year && q.quarter == quarter)
}

/// The quarter columns of a chart
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    quarters: Vec<Quarter>,
}

impl Timeline {
    pub fn new(start: Quarter, end: Quarter) -> Self {
        Self {
            quarters: calculate_quarters(start, end),
        }
    }

    pub fn for_chart(chart: &Chart) -> Self {
        Self::new(chart.start(), chart.end())
    }

    pub fn len(&self) -> usize {
        self.quarters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quarters.is_empty()
    }

    pub fn quarters(&self) -> &[Quarter] {
        &self.quarters
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quarter> {
        self.quarters.iter()
    }

    pub fn index_of(&self, quarter: Quarter) -> Option<usize> {
        find_quarter_index(&self.quarters, quarter.year, quarter.quarter)
    }

    /// Column range `(start, end)` covered by a task.
    ///
    /// `None` when either end falls outside the timeline or the task ends
    /// before it starts; such tasks keep their label row but get no bar.
    pub fn span_of(&self, task: &Task) -> Option<(usize, usize)> {
        let start = self.index_of(task.start())?;
        let end = self.index_of(task.end())?;
        (start <= end).then_some((start, end))
    }
}
