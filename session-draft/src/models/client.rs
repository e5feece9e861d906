//! Client and ally records.

use serde::{Deserialize, Serialize};

/// A client of the practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Server-assigned client id.
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// A person associated with a client who may attend sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ally {
    pub id: i64,
    pub name: String,
    /// Relationship to the client (e.g. "mother", "support worker").
    #[serde(default)]
    pub relationship: String,
    /// Archived allies are kept for history but cannot be picked as attendees.
    #[serde(default)]
    pub archived: bool,
}
