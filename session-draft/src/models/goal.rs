//! Goals, milestones (subgoals) and the strategy catalogue.

use serde::{Deserialize, Serialize};

/// A long-term objective tracked for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A measurable milestone under a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subgoal {
    pub id: i64,
    pub goal_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A named intervention technique that can be applied to a milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}
