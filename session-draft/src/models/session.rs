//! Session status values and the persisted session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::RecordId;

/// Scheduling status of a session.
///
/// Older spellings are accepted on decode; any other value decodes as
/// `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Booked but not yet held.
    #[default]
    #[serde(alias = "upcoming")]
    Scheduled,
    /// Session took place.
    #[serde(alias = "complete", alias = "done")]
    Completed,
    /// Session was called off.
    #[serde(alias = "canceled")]
    Cancelled,
    /// Session moved to another slot.
    Rescheduled,
    #[serde(other)]
    Unknown,
}

impl SessionStatus {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rescheduled => "rescheduled",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a session note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    /// Still being written.
    #[default]
    Draft,
    /// Signed off.
    #[serde(alias = "complete")]
    Completed,
}

impl NoteStatus {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A session as listed by `GET /api/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: RecordId,
    pub client_id: i64,
    #[serde(default)]
    pub title: String,
    pub session_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub status: SessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_aliases_decode() {
        let decode = |s: &str| serde_json::from_str::<SessionStatus>(&format!("\"{s}\"")).unwrap();
        assert_eq!(decode("canceled"), SessionStatus::Cancelled);
        assert_eq!(decode("done"), SessionStatus::Completed);
        assert_eq!(decode("upcoming"), SessionStatus::Scheduled);
        assert_eq!(decode("no-show"), SessionStatus::Unknown);

        let note: NoteStatus = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(note, NoteStatus::Completed);
    }

    #[test]
    fn test_session_list_survives_odd_statuses() {
        let sessions: Vec<SessionRecord> = serde_json::from_str(
            r#"[
                {"id": 1, "clientId": 1, "status": "canceled"},
                {"id": "S2", "clientId": 1, "status": "no-show", "duration": 45}
            ]"#,
        )
        .unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].status, SessionStatus::Cancelled);
        assert_eq!(sessions[1].status, SessionStatus::Unknown);
        assert_eq!(sessions[1].id, RecordId::from("S2"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&SessionStatus::Rescheduled).unwrap();
        assert_eq!(json, "\"rescheduled\"");
        assert_eq!(NoteStatus::Draft.to_string(), "draft");
    }
}
