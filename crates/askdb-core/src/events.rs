use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Connectivity, MessageId};

/// Severity of a user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Events emitted by the conversation engine.
///
/// The engine pushes these into an internal outbox as side effects of
/// `send`/`clear`/probe operations; the presentation layer drains the outbox
/// and maps each event to a banner, toast, or log line. Exactly one
/// `NotificationRaised` is emitted per failed send.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ChatEvent {
    /// A user-facing notification (toast equivalent).
    NotificationRaised {
        severity: Severity,
        title: String,
        body: String,
        timestamp: DateTime<Utc>,
    },

    /// The connectivity flag changed value.
    ConnectivityChanged {
        connectivity: Connectivity,
        timestamp: DateTime<Utc>,
    },

    /// A reply was received and normalized for the given assistant message.
    ReplyReceived {
        message_id: MessageId,
        success: bool,
        has_visualization: bool,
        timestamp: DateTime<Utc>,
    },

    /// The local transcript was discarded.
    TranscriptCleared {
        discarded: usize,
        timestamp: DateTime<Utc>,
    },

    /// The backend acknowledged (or refused) a memory reset.
    MemoryCleared {
        success: bool,
        timestamp: DateTime<Utc>,
    },
}

impl ChatEvent {
    /// Returns the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ChatEvent::NotificationRaised { timestamp, .. }
            | ChatEvent::ConnectivityChanged { timestamp, .. }
            | ChatEvent::ReplyReceived { timestamp, .. }
            | ChatEvent::TranscriptCleared { timestamp, .. }
            | ChatEvent::MemoryCleared { timestamp, .. } => *timestamp,
        }
    }

    /// Returns a stable event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            ChatEvent::NotificationRaised { .. } => "notification_raised",
            ChatEvent::ConnectivityChanged { .. } => "connectivity_changed",
            ChatEvent::ReplyReceived { .. } => "reply_received",
            ChatEvent::TranscriptCleared { .. } => "transcript_cleared",
            ChatEvent::MemoryCleared { .. } => "memory_cleared",
        }
    }

    /// Convenience constructor for notifications.
    pub fn notification(
        severity: Severity,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        ChatEvent::NotificationRaised {
            severity,
            title: title.into(),
            body: body.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name_follows_variant() {
        let event = ChatEvent::ConnectivityChanged {
            connectivity: Connectivity::Unreachable,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_name(), "connectivity_changed");
    }

    #[test]
    fn test_timestamp_accessor() {
        let ts = Utc::now();
        let event = ChatEvent::TranscriptCleared {
            discarded: 4,
            timestamp: ts,
        };
        assert_eq!(event.timestamp(), ts);
    }

    #[test]
    fn test_notification_constructor() {
        let event = ChatEvent::notification(Severity::Error, "Server error", "try again later");
        match &event {
            ChatEvent::NotificationRaised {
                severity,
                title,
                body,
                ..
            } => {
                assert_eq!(*severity, Severity::Error);
                assert_eq!(title, "Server error");
                assert_eq!(body, "try again later");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(event.event_name(), "notification_raised");
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
        let sev: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(sev, Severity::Warning);
    }

    #[test]
    fn test_variants_round_trip_through_json() {
        let ts = Utc::now();
        let events: Vec<ChatEvent> = vec![
            ChatEvent::NotificationRaised {
                severity: Severity::Error,
                title: "Connection error".to_string(),
                body: "could not reach the server".to_string(),
                timestamp: ts,
            },
            ChatEvent::ConnectivityChanged {
                connectivity: Connectivity::Healthy,
                timestamp: ts,
            },
            ChatEvent::ReplyReceived {
                message_id: MessageId::new(),
                success: true,
                has_visualization: false,
                timestamp: ts,
            },
            ChatEvent::TranscriptCleared {
                discarded: 0,
                timestamp: ts,
            },
            ChatEvent::MemoryCleared {
                success: false,
                timestamp: ts,
            },
        ];

        for event in &events {
            let json = serde_json::to_string(event).unwrap();
            let decoded: ChatEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(event.event_name(), decoded.event_name());
            assert_eq!(event.timestamp(), decoded.timestamp());
        }
    }
}
