//! Plain-text rendering of the conversation for the terminal.
//!
//! Every function returns a `String` so formatting stays testable; `main`
//! owns the actual printing. Replies render as a bubble line followed by
//! optional SQL, table, step, and chart sections.

use chrono::Local;
use serde_json::Value;

use askdb_chart::{abbreviate_tick, adapt, group_thousands, percent_label, ChartRenderData};
use askdb_core::config::DisplayConfig;
use askdb_core::events::{ChatEvent, Severity};
use askdb_core::types::{BackendReply, Message, MessageStatus, ReplyStep, VisualizationSpec};

/// Connection banner printed at startup and echoed on reconnect.
pub fn banner(healthy: bool, base_url: &str) -> String {
    if healthy {
        format!("Connected to server ({base_url})\n")
    } else {
        format!(
            "Server unavailable. Check that the backend is running on {base_url}\n"
        )
    }
}

pub fn welcome() -> String {
    [
        "",
        "Welcome to askdb",
        "Ask questions about your data in plain language. Try one of these:",
        "  - Find the largest transaction for each week",
        "  - Show the top 10 customers by total purchases",
        "  - Which spending category is the most popular?",
        "Type :clear to reset the conversation, :quit to exit.",
        "",
        "",
    ]
    .join("\n")
}

pub fn loading_line() -> &'static str {
    "Analyzing the question and running SQL..."
}

pub fn cleared() -> &'static str {
    "Chat cleared.\n"
}

/// Notification and connectivity lines for events drained after a send.
pub fn events_block(events: &[ChatEvent], base_url: &str) -> String {
    let mut out = String::new();
    for event in events {
        match event {
            ChatEvent::NotificationRaised {
                severity,
                title,
                body,
                ..
            } => {
                out.push_str(&format!("[{}] {}: {}\n", severity_tag(severity), title, body));
            }
            ChatEvent::ConnectivityChanged { connectivity, .. } => {
                out.push_str(&banner(connectivity.is_healthy(), base_url));
            }
            _ => {}
        }
    }
    out
}

/// One chat message with all of its reply sections.
pub fn message_block(message: &Message, display: &DisplayConfig) -> String {
    let time = message.created_at.with_timezone(&Local).format("%H:%M");

    if message.status == MessageStatus::Failed {
        return format!("[{time}] [Error] {}\n", message.text);
    }

    let Some(reply) = &message.reply else {
        return format!("[{time}] {}\n", message.text);
    };

    let mut out = String::new();
    let status = if reply.success { "OK" } else { "Error" };
    if reply.tool_used.is_empty() {
        out.push_str(&format!("[{time}] [{status}] {}\n", message.text));
    } else {
        out.push_str(&format!(
            "[{time}] [{status}] ({}) {}\n",
            reply.tool_used, message.text
        ));
    }

    if !reply.sql.is_empty() {
        out.push_str("\n  SQL:\n");
        for line in reply.sql.lines() {
            out.push_str(&format!("    {line}\n"));
        }
    }

    if reply.has_table() {
        out.push('\n');
        out.push_str(&table_block(reply, display.max_table_rows));
    }

    if display.show_steps && !reply.steps.is_empty() {
        out.push('\n');
        out.push_str(&steps_block(&reply.steps));
    }

    if let Some(viz) = &reply.visualization {
        out.push('\n');
        out.push_str(&chart_block(viz));
    }

    out
}

/// Result rows as an aligned text table, capped at `max_rows`.
pub fn table_block(reply: &BackendReply, max_rows: usize) -> String {
    let columns = reply.columns();
    if columns.is_empty() {
        return String::new();
    }

    let shown: Vec<_> = reply.rows.iter().take(max_rows).collect();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown.len());
    for row in &shown {
        let cells: Vec<String> = columns
            .iter()
            .map(|col| cell_text(row.get(col.as_str())))
            .collect();
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
        grid.push(cells);
    }

    let mut out = format!("  {} rows\n", reply.row_count);
    let header = columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{:<width$}", col, width = widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&format!("  {}\n", header.trim_end()));
    for cells in &grid {
        let line = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&format!("  {}\n", line.trim_end()));
    }
    if reply.rows.len() > max_rows {
        out.push_str(&format!("  ... and {} more rows\n", reply.rows.len() - max_rows));
    }
    out
}

/// Pipeline steps with readable titles for the known node names.
pub fn steps_block(steps: &[ReplyStep]) -> String {
    let mut out = format!("  Intermediate steps ({})\n", steps.len());
    for step in steps {
        let payload = payload_text(&step.payload);
        if payload.contains('\n') {
            out.push_str(&format!("  - {}:\n", step_title(&step.label)));
            for line in payload.lines() {
                out.push_str(&format!("      {line}\n"));
            }
        } else {
            out.push_str(&format!("  - {}: {}\n", step_title(&step.label), payload));
        }
    }
    out
}

/// Chart section: title line with the wire kind, then one line per element.
pub fn chart_block(spec: &VisualizationSpec) -> String {
    let rendered = adapt(spec);
    let badge = spec.chart_type.to_uppercase();
    let mut out = if rendered.title().is_empty() {
        format!("  [{badge}]\n")
    } else {
        format!("  {} [{badge}]\n", rendered.title())
    };

    match rendered {
        ChartRenderData::Histogram { bars, .. } => {
            let tallest = bars.iter().map(|b| b.count).max().unwrap_or(0).max(1);
            for bar in &bars {
                let width = ((bar.count as f64 / tallest as f64) * 30.0).round() as usize;
                out.push_str(&format!(
                    "    {:>16}  {:<30}  {} ({})\n",
                    bar.label,
                    "#".repeat(width),
                    bar.count,
                    percent_label(bar.pct)
                ));
            }
        }
        ChartRenderData::Pie { slices, .. } => {
            let total: f64 = slices.iter().map(|s| s.value).sum();
            for slice in &slices {
                let share = if total > 0.0 { slice.value / total } else { 0.0 };
                out.push_str(&format!(
                    "    {}  {} ({})\n",
                    slice.name,
                    group_thousands(slice.value),
                    percent_label(share)
                ));
            }
        }
        ChartRenderData::Scatter {
            x_label,
            y_label,
            points,
            ..
        } => {
            for point in &points {
                out.push_str(&format!(
                    "    {}: ({}, {})\n",
                    point.name,
                    group_thousands(point.x),
                    group_thousands(point.y)
                ));
            }
            if let Some((lo, hi)) = span(points.iter().map(|p| p.y)) {
                out.push_str(&format!(
                    "    y range: {}..{}\n",
                    abbreviate_tick(lo),
                    abbreviate_tick(hi)
                ));
            }
            if !x_label.is_empty() && !y_label.is_empty() {
                out.push_str(&format!("    {x_label} vs {y_label}\n"));
            }
        }
        ChartRenderData::Line {
            x_label,
            y_label,
            points,
            ..
        } => {
            for point in &points {
                out.push_str(&format!("    {}  {}\n", point.label, group_thousands(point.y)));
            }
            if !x_label.is_empty() && !y_label.is_empty() {
                out.push_str(&format!("    {x_label} vs {y_label}\n"));
            }
        }
        ChartRenderData::Placeholder { notice, .. } => {
            out.push_str(&format!("    {notice}\n"));
        }
    }
    out
}

// ============================================================================
// Private helpers
// ============================================================================

fn severity_tag(severity: &Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warn",
        Severity::Error => "error",
    }
}

fn step_title(label: &str) -> &str {
    match label {
        "sql_metainfo" => "Fetching metadata",
        "sql_policies" => "Checking policies",
        "sql_exec" => "Executing query",
        other => other,
    }
}

/// Scalar payloads print inline; records pretty-print over several lines.
fn payload_text(payload: &Value) -> String {
    match payload {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => {
            // Midnight timestamps read better as plain dates.
            if s.contains("T00:00:00") {
                s.split('T').next().unwrap_or(s).to_string()
            } else {
                s.clone()
            }
        }
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for v in values {
        bounds = Some(match bounds {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    bounds
}
