//! Chart input files
//!
//! A file holds either a single chart object or a chart store: an object
//! mapping chart ids to charts.

use anyhow::{bail, Context, Result};
use qgantt_core::Chart;
use serde_json::Value;
use std::path::Path;

/// Keys that mark an object as a chart rather than a store
const CHART_KEYS: [&str; 4] = ["title", "categories", "startYear", "endYear"];

/// Read every chart in `path`
pub fn load_charts(path: &Path) -> Result<Vec<Chart>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_charts(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_charts(json: &str) -> Result<Vec<Chart>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = value else {
        bail!("expected a chart object or an object of charts keyed by id");
    };

    if CHART_KEYS.iter().any(|key| map.contains_key(*key)) {
        let chart: Chart = serde_json::from_value(Value::Object(map))?;
        return Ok(vec![chart]);
    }

    map.into_iter()
        .map(|(id, value)| {
            let mut chart: Chart = serde_json::from_value(value)
                .with_context(|| format!("Invalid chart '{}'", id))?;
            if chart.id.is_empty() {
                chart.id = id;
            }
            Ok(chart)
        })
        .collect()
}

/// Pick the chart to render
pub fn select_chart(charts: Vec<Chart>, id: Option<&str>) -> Result<Chart> {
    if let Some(id) = id {
        let available = chart_ids(&charts);
        return charts
            .into_iter()
            .find(|c| c.id == id)
            .with_context(|| format!("No chart with id '{}' (available: {})", id, available));
    }

    if charts.len() > 1 {
        bail!(
            "The input contains {} charts; choose one with --chart (available: {})",
            charts.len(),
            chart_ids(&charts)
        );
    }
    charts
        .into_iter()
        .next()
        .context("The input contains no charts")
}

fn chart_ids(charts: &[Chart]) -> String {
    charts
        .iter()
        .map(|c| c.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SINGLE: &str = r##"{
        "id": "road",
        "title": "Roadmap",
        "startYear": 2024, "startQuarter": 1, "endYear": 2024, "endQuarter": 4,
        "categories": [{"id": "c", "name": "Eng", "color": "#3366FF", "tasks": []}]
    }"##;

    const STORE: &str = r#"{
        "b-chart": {"title": "Second", "startYear": 2024, "startQuarter": 1, "endYear": 2024, "endQuarter": 2},
        "a-chart": {"id": "a-chart", "title": "First", "startYear": 2025, "startQuarter": 1, "endYear": 2025, "endQuarter": 1}
    }"#;

    #[test]
    fn parses_single_chart() {
        let charts = parse_charts(SINGLE).unwrap();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "Roadmap");
        assert_eq!(charts[0].categories[0].name, "Eng");
    }

    #[test]
    fn parses_store_and_fills_ids() {
        let charts = parse_charts(STORE).unwrap();
        let ids: Vec<&str> = charts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a-chart", "b-chart"]);
        assert_eq!(charts[1].title, "Second");
    }

    #[test]
    fn empty_store_has_no_charts() {
        assert!(parse_charts("{}").unwrap().is_empty());
        assert!(select_chart(vec![], None).is_err());
    }

    #[test]
    fn rejects_non_objects() {
        assert!(parse_charts("[1, 2]").is_err());
        assert!(parse_charts("not json").is_err());
    }

    #[test]
    fn selects_by_id_or_single() {
        let charts = parse_charts(STORE).unwrap();
        assert_eq!(select_chart(charts.clone(), Some("b-chart")).unwrap().title, "Second");

        let err = select_chart(charts.clone(), None).unwrap_err().to_string();
        assert!(err.contains("a-chart, b-chart"), "{err}");

        let err = select_chart(charts, Some("zzz")).unwrap_err().to_string();
        assert!(err.contains("No chart with id 'zzz'"), "{err}");

        let single = parse_charts(SINGLE).unwrap();
        assert_eq!(select_chart(single, None).unwrap().id, "road");
    }
}
