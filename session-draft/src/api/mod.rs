//! Practice-management REST API.
//!
//! Endpoints used:
//! - GET  /api/clients
//! - GET  /api/clients/{clientId}/allies
//! - GET  /api/clients/{clientId}/goals
//! - GET  /api/goals/{goalId}/subgoals
//! - GET  /api/clients/{clientId}/budget-settings
//! - GET  /api/clients/{clientId}/budget-items
//! - GET  /api/strategies
//! - GET  /api/sessions
//! - POST /api/sessions
//! - POST /api/sessions/{sessionId}/notes
//! - POST /api/session-notes/{noteId}/performance
//!   (or /api/sessions/{sessionId}/performance-assessments)

mod http;
mod payload;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Ally, BudgetItem, BudgetSettings, Client, Goal, SessionRecord, Strategy, Subgoal,
};

pub use http::HttpPracticeApi;
pub use payload::{MilestonePayload, NewAssessment, NewSession, NewSessionNote, ProductPayload};

/// Server-assigned id. The API returns numbers for some resources and
/// strings for others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// Body returned by every create endpoint; only the id is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: RecordId,
}

/// Where performance assessments are posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentRoute {
    /// `POST /api/session-notes/{noteId}/performance`
    #[default]
    NotePerformance,
    /// `POST /api/sessions/{sessionId}/performance-assessments`
    SessionPerformanceAssessments,
}

impl AssessmentRoute {
    pub fn path(self, target: &AssessmentTarget) -> String {
        match self {
            Self::NotePerformance => format!("/api/session-notes/{}/performance", target.note_id),
            Self::SessionPerformanceAssessments => format!(
                "/api/sessions/{}/performance-assessments",
                target.session_id
            ),
        }
    }
}

/// Records an assessment hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentTarget {
    pub session_id: RecordId,
    pub note_id: RecordId,
}

/// A failed API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("failed to parse response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} timed out after {after:?}")]
    Timeout { path: String, after: Duration },
}

impl ApiError {
    /// Whether this is a 404 from the server.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Operations the session dialog needs from the practice API.
#[async_trait]
pub trait PracticeApi: Send + Sync {
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError>;

    async fn list_allies(&self, client_id: i64) -> Result<Vec<Ally>, ApiError>;

    async fn list_goals(&self, client_id: i64) -> Result<Vec<Goal>, ApiError>;

    async fn list_subgoals(&self, goal_id: i64) -> Result<Vec<Subgoal>, ApiError>;

    /// The client's budget plan header, `None` if the client has none.
    async fn budget_settings(&self, client_id: i64) -> Result<Option<BudgetSettings>, ApiError>;

    async fn list_budget_items(&self, client_id: i64) -> Result<Vec<BudgetItem>, ApiError>;

    async fn list_strategies(&self) -> Result<Vec<Strategy>, ApiError>;

    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, ApiError>;

    async fn create_session(&self, session: &NewSession) -> Result<CreatedRecord, ApiError>;

    async fn create_note(
        &self,
        session_id: &RecordId,
        note: &NewSessionNote,
    ) -> Result<CreatedRecord, ApiError>;

    async fn create_assessment(
        &self,
        target: &AssessmentTarget,
        assessment: &NewAssessment,
    ) -> Result<CreatedRecord, ApiError>;
}
