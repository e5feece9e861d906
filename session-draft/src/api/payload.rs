//! Request bodies built from a draft.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::RecordId;
use crate::draft::{GoalAssessment, ProductLine, SessionDraft, ValidationIssue};
use crate::models::{NoteStatus, SessionStatus};

/// Body of `POST /api/sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub client_id: i64,
    pub session_date: DateTime<Utc>,
    pub duration: u32,
    pub location: String,
    pub title: String,
    pub description: String,
    pub status: SessionStatus,
}

impl NewSession {
    /// # Errors
    ///
    /// The first missing required field.
    pub fn from_draft(draft: &SessionDraft) -> Result<Self, ValidationIssue> {
        let fields = &draft.session;
        Ok(Self {
            client_id: fields.client_id.ok_or(ValidationIssue::MissingClient)?,
            session_date: fields
                .session_date_time
                .ok_or(ValidationIssue::MissingDateTime)?,
            duration: fields.duration_minutes,
            location: fields.location.clone(),
            title: fields.title.clone(),
            description: fields.description.clone(),
            status: fields.status,
        })
    }
}

/// A product line as sent to the API (no availability snapshot).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub budget_item_id: i64,
    pub product_code: String,
    pub product_description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl From<&ProductLine> for ProductPayload {
    fn from(line: &ProductLine) -> Self {
        Self {
            budget_item_id: line.budget_item_id(),
            product_code: line.product_code().to_string(),
            product_description: line.product_description().to_string(),
            quantity: line.quantity(),
            unit_price: line.unit_price(),
        }
    }
}

/// Body of `POST /api/sessions/{sessionId}/notes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionNote {
    pub session_id: RecordId,
    pub client_id: i64,
    pub present_allies: Vec<String>,
    pub present_ally_ids: Vec<i64>,
    pub mood_rating: i32,
    pub focus_rating: i32,
    pub cooperation_rating: i32,
    pub physical_activity_rating: i32,
    pub notes: String,
    pub products: Vec<ProductPayload>,
    pub status: NoteStatus,
}

impl NewSessionNote {
    pub fn from_draft(draft: &SessionDraft, session_id: RecordId, client_id: i64) -> Self {
        let note = &draft.note;
        let attendees = note.attendees();
        Self {
            session_id,
            client_id,
            present_allies: attendees.names().to_vec(),
            present_ally_ids: attendees.ids().to_vec(),
            mood_rating: note.ratings.mood,
            focus_rating: note.ratings.focus,
            cooperation_rating: note.ratings.cooperation,
            physical_activity_rating: note.ratings.physical_activity,
            notes: note.free_text_notes.clone(),
            products: note.products().iter().map(ProductPayload::from).collect(),
            status: note.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePayload {
    pub milestone_id: i64,
    pub rating: u8,
    pub strategies: Vec<String>,
    pub notes: String,
}

/// Body of the performance-assessment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssessment {
    pub session_note_id: RecordId,
    pub goal_id: i64,
    pub notes: String,
    pub milestones: Vec<MilestonePayload>,
}

impl NewAssessment {
    pub fn from_assessment(assessment: &GoalAssessment, note_id: RecordId) -> Self {
        Self {
            session_note_id: note_id,
            goal_id: assessment.goal_id(),
            notes: assessment.notes().to_string(),
            milestones: assessment
                .milestones()
                .iter()
                .map(|m| MilestonePayload {
                    milestone_id: m.milestone_id(),
                    rating: m.rating(),
                    strategies: m.strategies().to_vec(),
                    notes: m.notes().to_string(),
                })
                .collect(),
        }
    }
}
