use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Who authored a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Typed by the person asking questions.
    User,
    /// Produced by the remote query service (or synthesized on failure).
    Assistant,
}

/// Lifecycle phase of a chat message.
///
/// A message is created `Pending` (assistant placeholder) or `Resolved`
/// (user text); a pending placeholder is replaced by exactly one `Resolved`
/// or `Failed` message and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Waiting on the in-flight request.
    Pending,
    /// Carries a normalized reply (assistant) or final text (user).
    Resolved,
    /// Terminal apology after a classified request failure.
    Failed,
}

/// Reachability of the remote query service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Last probe or request succeeded. Assumed at startup until probed.
    #[default]
    Healthy,
    /// Last probe or request failed at the transport level.
    Unreachable,
}

impl Connectivity {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Connectivity::Healthy)
    }
}

/// Declared chart type of a visualization payload.
///
/// Derived from the wire string via [`VisualizationSpec::kind`]; the raw
/// string stays on the payload so unrecognized values survive for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Histogram,
    Pie,
    Scatter,
    Line,
    /// Backend declared it could not build a chart.
    Error,
    /// Anything this client does not recognize (including "none").
    Other,
}

impl ChartKind {
    /// Maps a wire `chart_type` string to a dispatchable kind.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "histogram" => ChartKind::Histogram,
            "pie" => ChartKind::Pie,
            "scatter" => ChartKind::Scatter,
            "line" => ChartKind::Line,
            "error" => ChartKind::Error,
            _ => ChartKind::Other,
        }
    }
}

// =============================================================================
// Newtype Wrappers - Identity
// =============================================================================

/// Unique identifier for a chat message, local to one engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Chat transcript
// =============================================================================

/// One entry in the conversation transcript.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub status: MessageStatus,
    /// Display text: the question, the reply text, or the apology.
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Set only on resolved assistant messages.
    pub reply: Option<BackendReply>,
}

impl Message {
    /// A resolved user message carrying the (trimmed) question text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            status: MessageStatus::Resolved,
            text: text.into(),
            created_at: Utc::now(),
            reply: None,
        }
    }

    /// The assistant placeholder shown while a request is in flight.
    pub fn pending_assistant() -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            status: MessageStatus::Pending,
            text: String::new(),
            created_at: Utc::now(),
            reply: None,
        }
    }

    /// A resolved assistant message carrying a normalized reply.
    pub fn resolved_assistant(reply: BackendReply) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            status: MessageStatus::Resolved,
            text: reply.text.clone(),
            created_at: Utc::now(),
            reply: Some(reply),
        }
    }

    /// A terminal assistant message appended after a failed request.
    pub fn failed_assistant(apology: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            status: MessageStatus::Failed,
            text: apology.into(),
            created_at: Utc::now(),
            reply: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }
}

// =============================================================================
// Normalized backend reply
// =============================================================================

/// One intermediate pipeline step reported by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplyStep {
    /// Raw step name from the wire (`node` or `action`).
    pub label: String,
    /// Scalar or record; rendered as text or pretty JSON accordingly.
    pub payload: Value,
}

/// Canonical envelope both wire shapes normalize into.
///
/// Invariants upheld by the parser: `rows` is non-empty only when `success`
/// is true; `row_count` is the backend-declared count for the legacy shape
/// (0 when the marker is absent) and `rows.len()` for the structured shape.
/// A declared count that disagrees with `rows.len()` is preserved as-is.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BackendReply {
    /// Main answer text shown in the chat bubble.
    pub text: String,
    pub success: bool,
    /// Tool or route the backend picked for this question.
    pub tool_used: String,
    /// Extracted or explicit SQL statement; empty when none was found.
    pub sql: String,
    /// Tabular result rows; loosely typed records.
    pub rows: Vec<serde_json::Map<String, Value>>,
    /// Declared or derived row count; see the struct invariants.
    pub row_count: u64,
    pub steps: Vec<ReplyStep>,
    pub visualization: Option<VisualizationSpec>,
}

impl BackendReply {
    /// Column set for tabular display: the key set of the first row.
    ///
    /// Rows after the first may have a different key set; missing keys
    /// render as empty cells.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_table(&self) -> bool {
        !self.rows.is_empty()
    }
}

// =============================================================================
// Visualization payload
// =============================================================================

/// Axis labels and tooltip hints attached to a visualization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartMeta {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Record fields the backend suggests surfacing in tooltips.
    pub tooltip_fields: Vec<String>,
}

/// Chart payload as declared by the backend, consumed once by the adapter.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VisualizationSpec {
    /// Raw wire value; kept verbatim so unknown kinds can be named in the
    /// unsupported-chart notice. Missing on the wire becomes empty, which
    /// dispatches as [`ChartKind::Other`].
    #[serde(default)]
    pub chart_type: String,
    #[serde(default)]
    pub meta: ChartMeta,
    /// Loosely typed series records.
    #[serde(default)]
    pub data: Vec<Value>,
}

impl VisualizationSpec {
    pub fn kind(&self) -> ChartKind {
        ChartKind::from_wire(&self.chart_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ---- enums ----

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_message_status_serialization() {
        assert_eq!(
            serde_json::to_string(&MessageStatus::Pending).unwrap(),
            "\"pending\""
        );
        let status: MessageStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(status, MessageStatus::Failed);
    }

    #[test]
    fn test_connectivity_default_is_healthy() {
        assert!(Connectivity::default().is_healthy());
        assert!(!Connectivity::Unreachable.is_healthy());
    }

    #[test]
    fn test_chart_kind_from_wire() {
        assert_eq!(ChartKind::from_wire("histogram"), ChartKind::Histogram);
        assert_eq!(ChartKind::from_wire("pie"), ChartKind::Pie);
        assert_eq!(ChartKind::from_wire("scatter"), ChartKind::Scatter);
        assert_eq!(ChartKind::from_wire("line"), ChartKind::Line);
        assert_eq!(ChartKind::from_wire("error"), ChartKind::Error);
        assert_eq!(ChartKind::from_wire("radar"), ChartKind::Other);
        assert_eq!(ChartKind::from_wire("none"), ChartKind::Other);
        assert_eq!(ChartKind::from_wire(""), ChartKind::Other);
    }

    // ---- messages ----

    #[test]
    fn test_message_constructors() {
        let user = Message::user("show revenue");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.status, MessageStatus::Resolved);
        assert_eq!(user.text, "show revenue");
        assert!(user.reply.is_none());
        assert!(!user.is_pending());

        let placeholder = Message::pending_assistant();
        assert_eq!(placeholder.role, Role::Assistant);
        assert!(placeholder.is_pending());
        assert!(placeholder.text.is_empty());

        let failed = Message::failed_assistant("sorry");
        assert_eq!(failed.status, MessageStatus::Failed);
        assert_eq!(failed.text, "sorry");
        assert!(failed.reply.is_none());
    }

    #[test]
    fn test_resolved_assistant_copies_reply_text() {
        let reply = BackendReply {
            text: "42 orders last week".to_string(),
            success: true,
            ..Default::default()
        };
        let msg = Message::resolved_assistant(reply);
        assert_eq!(msg.text, "42 orders last week");
        assert_eq!(msg.status, MessageStatus::Resolved);
        assert!(msg.reply.is_some());
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("a");
        let b = Message::user("b");
        assert_ne!(a.id, b.id);
    }

    // ---- backend reply ----

    fn row(pairs: &[(&str, Value)]) -> serde_json::Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_columns_from_first_row() {
        let reply = BackendReply {
            success: true,
            rows: vec![
                row(&[("name", json!("a")), ("total", json!(10))]),
                row(&[("name", json!("b"))]),
            ],
            ..Default::default()
        };
        let mut columns = reply.columns();
        columns.sort();
        assert_eq!(columns, vec!["name".to_string(), "total".to_string()]);
        assert!(reply.has_table());
    }

    #[test]
    fn test_columns_empty_without_rows() {
        let reply = BackendReply::default();
        assert!(reply.columns().is_empty());
        assert!(!reply.has_table());
    }

    #[test]
    fn test_backend_reply_serialization_round_trip() {
        let reply = BackendReply {
            text: "done".to_string(),
            success: true,
            tool_used: "sql".to_string(),
            sql: "SELECT 1".to_string(),
            rows: vec![row(&[("n", json!(1))])],
            row_count: 1,
            steps: vec![ReplyStep {
                label: "sql_exec".to_string(),
                payload: json!("ok"),
            }],
            visualization: None,
        };
        let encoded = serde_json::to_string(&reply).unwrap();
        let decoded: BackendReply = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.text, "done");
        assert_eq!(decoded.row_count, 1);
        assert_eq!(decoded.steps.len(), 1);
        assert_eq!(decoded.steps[0].label, "sql_exec");
    }

    // ---- visualization ----

    #[test]
    fn test_visualization_spec_from_wire_json() {
        let spec: VisualizationSpec = serde_json::from_value(json!({
            "chart_type": "histogram",
            "meta": {
                "title": "Amounts",
                "x_label": "amount",
                "y_label": "count",
                "tooltip_fields": ["pct"]
            },
            "data": [{"bin_start": 0.0, "bin_end": 10.0, "count": 3, "pct": 0.3}]
        }))
        .unwrap();
        assert_eq!(spec.kind(), ChartKind::Histogram);
        assert_eq!(spec.meta.title, "Amounts");
        assert_eq!(spec.meta.tooltip_fields, vec!["pct".to_string()]);
        assert_eq!(spec.data.len(), 1);
    }

    #[test]
    fn test_visualization_spec_missing_meta_and_data() {
        let spec: VisualizationSpec =
            serde_json::from_value(json!({"chart_type": "radar"})).unwrap();
        assert_eq!(spec.kind(), ChartKind::Other);
        assert_eq!(spec.chart_type, "radar");
        assert!(spec.meta.title.is_empty());
        assert!(spec.data.is_empty());
    }

    #[test]
    fn test_chart_meta_defaults() {
        let meta: ChartMeta = serde_json::from_value(json!({"title": "T"})).unwrap();
        assert_eq!(meta.title, "T");
        assert!(meta.x_label.is_empty());
        assert!(meta.y_label.is_empty());
        assert!(meta.tooltip_fields.is_empty());
    }
}
