//! Presentation-ready chart data, independent of any drawing toolkit.

use serde_json::Value;

/// One histogram bar.
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramBar {
    /// Bin label, `start-end` with both bounds to one decimal.
    pub label: String,
    pub bin_start: f64,
    pub bin_end: f64,
    pub count: u64,
    /// Share of the total as a fraction in `0..=1`, as declared on the wire.
    /// Multiply by 100 for display.
    pub pct: f64,
}

/// One pie slice, already colored.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    /// Palette color assigned by slice position.
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub name: String,
}

/// One line-chart point.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePoint {
    /// X-axis label, with timestamp-like values truncated to the date part.
    pub label: String,
    /// The untruncated wire value (or the item index when `x` was absent).
    pub original_x: Value,
    pub y: f64,
    pub name: String,
}

/// What a front-end should draw for one visualization payload.
///
/// Every payload adapts to exactly one of these; payloads that cannot be
/// drawn become a [`ChartRenderData::Placeholder`] notice.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartRenderData {
    Histogram {
        title: String,
        y_label: String,
        bars: Vec<HistogramBar>,
    },
    Pie {
        title: String,
        slices: Vec<PieSlice>,
    },
    Scatter {
        title: String,
        x_label: String,
        y_label: String,
        points: Vec<ScatterPoint>,
    },
    Line {
        title: String,
        x_label: String,
        y_label: String,
        points: Vec<LinePoint>,
    },
    /// A textual notice shown in place of a chart.
    Placeholder { title: String, notice: String },
}

impl ChartRenderData {
    pub fn title(&self) -> &str {
        match self {
            ChartRenderData::Histogram { title, .. }
            | ChartRenderData::Pie { title, .. }
            | ChartRenderData::Scatter { title, .. }
            | ChartRenderData::Line { title, .. }
            | ChartRenderData::Placeholder { title, .. } => title,
        }
    }
}
