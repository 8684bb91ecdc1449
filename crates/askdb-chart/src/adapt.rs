//! Adapts wire visualization payloads into presentation-ready chart data.
//!
//! Adaptation is total and never panics: missing or mistyped fields fall
//! back per point, with one deliberate difference from the reference
//! front-end's `||` chains: a numeric field that is present with value 0
//! stays 0 instead of falling through to the next candidate. Null fields
//! count as absent.

use serde_json::Value;

use askdb_core::types::{ChartKind, VisualizationSpec};

use crate::format::{one_decimal, palette_color, truncate_date_label};
use crate::types::{ChartRenderData, HistogramBar, LinePoint, PieSlice, ScatterPoint};

/// Notice shown when the backend itself failed to build a chart.
const CHART_ERROR_NOTICE: &str = "Failed to build the chart";

/// Adapts one visualization payload into drawable data.
pub fn adapt(spec: &VisualizationSpec) -> ChartRenderData {
    match spec.kind() {
        ChartKind::Histogram => histogram(spec),
        ChartKind::Pie => pie(spec),
        ChartKind::Scatter => scatter(spec),
        ChartKind::Line => line(spec),
        ChartKind::Error => ChartRenderData::Placeholder {
            title: spec.meta.title.clone(),
            notice: CHART_ERROR_NOTICE.to_string(),
        },
        ChartKind::Other => ChartRenderData::Placeholder {
            title: spec.meta.title.clone(),
            notice: format!("Unsupported chart type: {}", spec.chart_type),
        },
    }
}

fn histogram(spec: &VisualizationSpec) -> ChartRenderData {
    let bars = spec
        .data
        .iter()
        .map(|item| {
            let bin_start = numeric(item, "bin_start").unwrap_or(0.0);
            let bin_end = numeric(item, "bin_end").unwrap_or(0.0);
            HistogramBar {
                label: format!("{}-{}", one_decimal(bin_start), one_decimal(bin_end)),
                bin_start,
                bin_end,
                count: numeric(item, "count").unwrap_or(0.0) as u64,
                pct: numeric(item, "pct").unwrap_or(0.0),
            }
        })
        .collect();

    ChartRenderData::Histogram {
        title: spec.meta.title.clone(),
        y_label: spec.meta.y_label.clone(),
        bars,
    }
}

fn pie(spec: &VisualizationSpec) -> ChartRenderData {
    let slices = spec
        .data
        .iter()
        .enumerate()
        .map(|(index, item)| PieSlice {
            name: text(item, "name").unwrap_or_else(|| format!("Category {}", index + 1)),
            value: numeric(item, "value")
                .or_else(|| numeric(item, "count"))
                .unwrap_or(0.0),
            color: palette_color(index),
        })
        .collect();

    ChartRenderData::Pie {
        title: spec.meta.title.clone(),
        slices,
    }
}

fn scatter(spec: &VisualizationSpec) -> ChartRenderData {
    let meta = &spec.meta;
    let points = spec
        .data
        .iter()
        .enumerate()
        .map(|(index, item)| ScatterPoint {
            x: numeric(item, "x")
                .or_else(|| labeled_numeric(item, &meta.x_label))
                .unwrap_or(index as f64),
            y: numeric(item, "y")
                .or_else(|| labeled_numeric(item, &meta.y_label))
                .or_else(|| numeric(item, "value"))
                .unwrap_or(0.0),
            name: text(item, "name").unwrap_or_else(|| format!("Point {}", index + 1)),
        })
        .collect();

    ChartRenderData::Scatter {
        title: meta.title.clone(),
        x_label: meta.x_label.clone(),
        y_label: meta.y_label.clone(),
        points,
    }
}

fn line(spec: &VisualizationSpec) -> ChartRenderData {
    let meta = &spec.meta;
    let points = spec
        .data
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let original_x = match item.get("x") {
                None | Some(Value::Null) => Value::from(index),
                Some(value) => value.clone(),
            };
            let label = match &original_x {
                Value::String(s) => truncate_date_label(s),
                other => other.to_string(),
            };
            LinePoint {
                label,
                original_x,
                // Note the candidate order differs from scatter: here the
                // wire's `value` wins over `y`.
                y: numeric(item, "value")
                    .or_else(|| numeric(item, "y"))
                    .unwrap_or(0.0),
                name: text(item, "name")
                    .or_else(|| text(item, "label"))
                    .unwrap_or_else(|| format!("Point {}", index + 1)),
            }
        })
        .collect();

    ChartRenderData::Line {
        title: meta.title.clone(),
        x_label: meta.x_label.clone(),
        y_label: meta.y_label.clone(),
        points,
    }
}

// =============================================================================
// Field access
// =============================================================================

fn numeric(item: &Value, key: &str) -> Option<f64> {
    item.get(key).and_then(Value::as_f64)
}

/// Non-empty string field, or nothing.
fn text(item: &Value, key: &str) -> Option<String> {
    match item.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

/// Field lookup by axis label. Skipped for an empty label so it cannot
/// alias a literal empty-string key.
fn labeled_numeric(item: &Value, label: &str) -> Option<f64> {
    if label.is_empty() {
        return None;
    }
    numeric(item, label)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use askdb_core::types::ChartMeta;

    fn spec(chart_type: &str, meta: ChartMeta, data: Vec<Value>) -> VisualizationSpec {
        VisualizationSpec {
            chart_type: chart_type.to_string(),
            meta,
            data,
        }
    }

    fn meta(title: &str, x_label: &str, y_label: &str) -> ChartMeta {
        ChartMeta {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            tooltip_fields: vec![],
        }
    }

    // ---- histogram ----

    #[test]
    fn test_histogram_bars_from_wire_payload() {
        let spec = spec(
            "histogram",
            meta("Histogram of amount", "amount", "count"),
            vec![
                json!({"bin_start": 0.0, "bin_end": 12.5, "count": 3, "pct": 0.3}),
                json!({"bin_start": 12.5, "bin_end": 25.0, "count": 7, "pct": 0.7}),
            ],
        );

        let ChartRenderData::Histogram { title, y_label, bars } = adapt(&spec) else {
            panic!("expected histogram");
        };
        assert_eq!(title, "Histogram of amount");
        assert_eq!(y_label, "count");
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "0.0-12.5");
        assert_eq!(bars[0].count, 3);
        assert_eq!(bars[0].pct, 0.3);
        assert_eq!(bars[1].label, "12.5-25.0");
    }

    #[test]
    fn test_histogram_label_rounds_half_away() {
        let spec = spec(
            "histogram",
            ChartMeta::default(),
            vec![json!({"bin_start": 2.25, "bin_end": 4.65, "count": 1, "pct": 1.0})],
        );
        let ChartRenderData::Histogram { bars, .. } = adapt(&spec) else {
            panic!("expected histogram");
        };
        assert_eq!(bars[0].label, "2.3-4.7");
    }

    #[test]
    fn test_histogram_empty_item_defaults() {
        let spec = spec("histogram", ChartMeta::default(), vec![json!({})]);
        let ChartRenderData::Histogram { bars, .. } = adapt(&spec) else {
            panic!("expected histogram");
        };
        assert_eq!(bars[0].label, "0.0-0.0");
        assert_eq!(bars[0].count, 0);
        assert_eq!(bars[0].pct, 0.0);
    }

    // ---- pie ----

    #[test]
    fn test_pie_slices_with_colors() {
        let data: Vec<Value> = (0..9)
            .map(|i| json!({"name": format!("cat-{}", i), "value": (i as f64) * 10.0}))
            .collect();
        let spec = spec("pie", meta("Pie: category", "", ""), data);

        let ChartRenderData::Pie { slices, .. } = adapt(&spec) else {
            panic!("expected pie");
        };
        assert_eq!(slices.len(), 9);
        assert_eq!(slices[0].name, "cat-0");
        assert_eq!(slices[0].color, "#0088FE");
        // Palette wraps after eight slices.
        assert_eq!(slices[8].color, "#0088FE");
    }

    #[test]
    fn test_pie_empty_item_defaults() {
        let spec = spec("pie", ChartMeta::default(), vec![json!({})]);
        let ChartRenderData::Pie { slices, .. } = adapt(&spec) else {
            panic!("expected pie");
        };
        assert_eq!(slices[0].name, "Category 1");
        assert_eq!(slices[0].value, 0.0);
    }

    #[test]
    fn test_pie_value_zero_does_not_fall_through_to_count() {
        let spec = spec(
            "pie",
            ChartMeta::default(),
            vec![json!({"name": "empty bucket", "value": 0, "count": 42})],
        );
        let ChartRenderData::Pie { slices, .. } = adapt(&spec) else {
            panic!("expected pie");
        };
        assert_eq!(slices[0].value, 0.0);
    }

    #[test]
    fn test_pie_count_fallback_when_value_absent() {
        let spec = spec(
            "pie",
            ChartMeta::default(),
            vec![json!({"name": "bucket", "count": 42})],
        );
        let ChartRenderData::Pie { slices, .. } = adapt(&spec) else {
            panic!("expected pie");
        };
        assert_eq!(slices[0].value, 42.0);
    }

    #[test]
    fn test_pie_blank_name_defaults() {
        let spec = spec(
            "pie",
            ChartMeta::default(),
            vec![json!({"name": "", "value": 1}), json!({"name": 7, "value": 2})],
        );
        let ChartRenderData::Pie { slices, .. } = adapt(&spec) else {
            panic!("expected pie");
        };
        assert_eq!(slices[0].name, "Category 1");
        assert_eq!(slices[1].name, "Category 2");
    }

    // ---- scatter ----

    #[test]
    fn test_scatter_direct_fields() {
        let spec = spec(
            "scatter",
            meta("Scatter y vs x", "amount", "total"),
            vec![json!({"x": 1.5, "y": 200.0}), json!({"x": 2.5, "y": 300.0})],
        );
        let ChartRenderData::Scatter { points, x_label, y_label, .. } = adapt(&spec) else {
            panic!("expected scatter");
        };
        assert_eq!(x_label, "amount");
        assert_eq!(y_label, "total");
        assert_eq!(points[0].x, 1.5);
        assert_eq!(points[1].y, 300.0);
        assert_eq!(points[0].name, "Point 1");
    }

    #[test]
    fn test_scatter_falls_back_to_labeled_fields() {
        let spec = spec(
            "scatter",
            meta("", "amount", "total"),
            vec![json!({"amount": 9.0, "total": 81.0})],
        );
        let ChartRenderData::Scatter { points, .. } = adapt(&spec) else {
            panic!("expected scatter");
        };
        assert_eq!(points[0].x, 9.0);
        assert_eq!(points[0].y, 81.0);
    }

    #[test]
    fn test_scatter_index_and_value_fallbacks() {
        let spec = spec(
            "scatter",
            ChartMeta::default(),
            vec![json!({"value": 5.0}), json!({"name": "second"})],
        );
        let ChartRenderData::Scatter { points, .. } = adapt(&spec) else {
            panic!("expected scatter");
        };
        // No x anywhere: the item index stands in.
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[0].y, 5.0);
        assert_eq!(points[1].x, 1.0);
        assert_eq!(points[1].y, 0.0);
        assert_eq!(points[1].name, "second");
    }

    #[test]
    fn test_scatter_zero_y_is_kept() {
        let spec = spec(
            "scatter",
            ChartMeta::default(),
            vec![json!({"x": 1.0, "y": 0, "value": 99.0})],
        );
        let ChartRenderData::Scatter { points, .. } = adapt(&spec) else {
            panic!("expected scatter");
        };
        assert_eq!(points[0].y, 0.0);
    }

    // ---- line ----

    #[test]
    fn test_line_truncates_timestamp_labels_and_keeps_original() {
        let spec = spec(
            "line",
            meta("Line y over x", "date", "amount"),
            vec![json!({"x": "2024-01-15T00:00:00+03:00", "y": 120.0})],
        );
        let ChartRenderData::Line { points, .. } = adapt(&spec) else {
            panic!("expected line");
        };
        assert_eq!(points[0].label, "2024-01-15");
        assert_eq!(points[0].original_x, json!("2024-01-15T00:00:00+03:00"));
        assert_eq!(points[0].y, 120.0);
    }

    #[test]
    fn test_line_value_wins_over_y() {
        let spec = spec(
            "line",
            ChartMeta::default(),
            vec![json!({"x": 1, "value": 10.0, "y": 99.0}), json!({"x": 2, "y": 7.0})],
        );
        let ChartRenderData::Line { points, .. } = adapt(&spec) else {
            panic!("expected line");
        };
        assert_eq!(points[0].y, 10.0);
        assert_eq!(points[1].y, 7.0);
    }

    #[test]
    fn test_line_numeric_and_missing_x_labels() {
        let spec = spec(
            "line",
            ChartMeta::default(),
            vec![json!({"x": 3, "y": 1.0}), json!({"y": 2.0}), json!({"x": null, "y": 3.0})],
        );
        let ChartRenderData::Line { points, .. } = adapt(&spec) else {
            panic!("expected line");
        };
        assert_eq!(points[0].label, "3");
        assert_eq!(points[1].label, "1");
        assert_eq!(points[1].original_x, json!(1));
        assert_eq!(points[2].label, "2");
    }

    #[test]
    fn test_line_name_falls_back_to_label_field() {
        let spec = spec(
            "line",
            ChartMeta::default(),
            vec![
                json!({"x": 1, "y": 1.0, "name": "named"}),
                json!({"x": 2, "y": 2.0, "label": "labeled"}),
                json!({"x": 3, "y": 3.0}),
            ],
        );
        let ChartRenderData::Line { points, .. } = adapt(&spec) else {
            panic!("expected line");
        };
        assert_eq!(points[0].name, "named");
        assert_eq!(points[1].name, "labeled");
        assert_eq!(points[2].name, "Point 3");
    }

    // ---- placeholders ----

    #[test]
    fn test_error_kind_yields_fixed_notice() {
        let spec = spec(
            "error",
            meta("No Data", "", ""),
            vec![],
        );
        assert_eq!(
            adapt(&spec),
            ChartRenderData::Placeholder {
                title: "No Data".to_string(),
                notice: "Failed to build the chart".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_kind_names_the_wire_type() {
        let spec = spec("radar", ChartMeta::default(), vec![json!({"a": 1})]);
        assert_eq!(
            adapt(&spec),
            ChartRenderData::Placeholder {
                title: String::new(),
                notice: "Unsupported chart type: radar".to_string(),
            }
        );
    }

    #[test]
    fn test_none_kind_is_unsupported() {
        let spec = spec("none", ChartMeta::default(), vec![]);
        let ChartRenderData::Placeholder { notice, .. } = adapt(&spec) else {
            panic!("expected placeholder");
        };
        assert_eq!(notice, "Unsupported chart type: none");
    }
}
