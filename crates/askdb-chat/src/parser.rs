//! Reply normalization for the two wire dialects the answering service speaks.
//!
//! The structured dialect carries explicit `sql`, `exec_result`, and
//! `visualization` fields. The legacy dialect buries SQL and result rows
//! inside free-form `reply` text, marked by `SQL:`, `Results:`, and
//! `Rows returned:` blocks. Both normalize into [`BackendReply`].
//!
//! Parsing is total: malformed input degrades field by field to defaults and
//! is logged, never surfaced as an error.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

use askdb_core::types::{BackendReply, ReplyStep, VisualizationSpec};

// =============================================================================
// Compiled regex set (compiled once, reused across calls)
// =============================================================================

/// `SQL:` on its own line, capturing everything up to the first blank line.
static SQL_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SQL:\s*\n([\s\S]*?)\n\n").unwrap());

/// `Results:` followed by a JSON array literal. The lazy quantifier stops at
/// the first `]`, so arrays nested inside a row truncate the literal and the
/// strict parse below rejects it.
static RESULTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Results:\s*(\[[\s\S]*?\])").unwrap());

/// `Rows returned: N` marker.
static ROW_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Rows returned:\s*(\d+)").unwrap());

// =============================================================================
// Entry point
// =============================================================================

/// Normalizes a raw reply body into the canonical envelope.
///
/// The legacy dialect is recognized by a string `reply` field; everything
/// else is read as the structured dialect. Unknown fields are ignored and
/// missing ones default.
pub fn parse_reply(raw: &Value) -> BackendReply {
    let is_legacy = raw
        .get("reply")
        .map(Value::is_string)
        .unwrap_or(false);

    if is_legacy {
        parse_legacy(raw)
    } else {
        parse_structured(raw)
    }
}

// =============================================================================
// Structured dialect
// =============================================================================

fn parse_structured(raw: &Value) -> BackendReply {
    let success = raw.get("success").and_then(Value::as_bool).unwrap_or(false);

    // A failed reply never carries a table, whatever exec_result says.
    let rows = if success {
        structured_rows(raw.get("exec_result"))
    } else {
        Vec::new()
    };
    let row_count = rows.len() as u64;

    BackendReply {
        text: string_field(raw, "output"),
        success,
        tool_used: string_field(raw, "route"),
        sql: string_field(raw, "sql"),
        rows,
        row_count,
        steps: structured_steps(raw.get("intermediate_steps")),
        visualization: parse_visualization(raw.get("visualization")),
    }
}

/// Reads `exec_result` as rows: either a JSON array of objects, or a string
/// holding the JSON encoding of one. Anything else yields no table.
fn structured_rows(value: Option<&Value>) -> Vec<Map<String, Value>> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => rows_from_items(items),
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => rows_from_items(&items),
            Ok(_) => {
                debug!("exec_result string decodes to a non-array; dropping table");
                Vec::new()
            }
            Err(error) => {
                debug!(%error, "exec_result string is not valid JSON; dropping table");
                Vec::new()
            }
        },
        Some(_) => {
            debug!("exec_result has an unsupported type; dropping table");
            Vec::new()
        }
    }
}

fn structured_steps(value: Option<&Value>) -> Vec<ReplyStep> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let step = item.as_object()?;
            Some(ReplyStep {
                label: step
                    .get("node")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                payload: step.get("output").cloned().unwrap_or(Value::Null),
            })
        })
        .collect()
}

fn parse_visualization(value: Option<&Value>) -> Option<VisualizationSpec> {
    let value = value?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<VisualizationSpec>(value.clone()) {
        Ok(spec) => Some(spec),
        Err(error) => {
            debug!(%error, "Malformed visualization payload; dropping it");
            None
        }
    }
}

// =============================================================================
// Legacy dialect
// =============================================================================

fn parse_legacy(raw: &Value) -> BackendReply {
    let text = string_field(raw, "reply");
    let success = raw.get("success").and_then(Value::as_bool).unwrap_or(false);

    let rows = if success { extract_rows(&text) } else { Vec::new() };

    BackendReply {
        sql: extract_sql(&text),
        // The declared count stands on its own: a marker that disagrees with
        // the parsed rows is preserved, not reconciled.
        row_count: extract_row_count(&text),
        rows,
        success,
        tool_used: string_field(raw, "tool_used"),
        steps: legacy_steps(raw.get("tool_result")),
        visualization: None,
        text,
    }
}

/// Extracts a SQL statement from legacy reply text, trimmed. Empty when the
/// `SQL:` marker is absent.
pub fn extract_sql(text: &str) -> String {
    SQL_BLOCK_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Extracts result rows from a `Results:` block in legacy reply text.
///
/// The array literal must parse strictly as JSON and every element must be
/// an object; otherwise there is no table.
pub fn extract_rows(text: &str) -> Vec<Map<String, Value>> {
    let Some(captures) = RESULTS_RE.captures(text) else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(&captures[1]) {
        Ok(Value::Array(items)) => rows_from_items(&items),
        Ok(_) => Vec::new(),
        Err(error) => {
            debug!(%error, "Results block is not valid JSON; dropping table");
            Vec::new()
        }
    }
}

/// Extracts the declared row count from a `Rows returned:` marker, 0 when
/// the marker is absent or unreadable.
pub fn extract_row_count(text: &str) -> u64 {
    ROW_COUNT_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn legacy_steps(tool_result: Option<&Value>) -> Vec<ReplyStep> {
    let Some(items) = tool_result
        .and_then(|value| value.get("intermediate_steps"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let step = item.as_object()?;
            Some(ReplyStep {
                label: step
                    .get("action")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                payload: step.get("result").cloned().unwrap_or(Value::Null),
            })
        })
        .collect()
}

// =============================================================================
// Shared helpers
// =============================================================================

fn string_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// All elements must be objects for the array to count as a table.
fn rows_from_items(items: &[Value]) -> Vec<Map<String, Value>> {
    let rows: Option<Vec<Map<String, Value>>> = items
        .iter()
        .map(|item| item.as_object().cloned())
        .collect();
    rows.unwrap_or_else(|| {
        debug!("Result array contains non-object rows; dropping table");
        Vec::new()
    })
}

// =============================================================================
// Tests
// =============================================================================
