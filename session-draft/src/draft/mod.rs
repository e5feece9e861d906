//! The session draft aggregate.
//!
//! A [`SessionDraft`] holds everything the "new session" dialog collects:
//! the session fields, the observation note (ratings, attendees, products)
//! and one performance assessment per selected goal. All mutation goes
//! through the operations in the submodules, which either apply fully or
//! leave the draft untouched and return a [`DraftError`].
//!
//! Invariants maintained here:
//! - at most one assessment per goal id
//! - at most one milestone per milestone id within a goal
//! - at most [`MAX_STRATEGIES`] strategies per milestone
//! - at most one product line per budget item id / product code, with
//!   `0 < quantity <= available_quantity`
//! - present ally ids and names stay paired index-for-index

mod assessment;
mod attendees;
mod error;
mod product;
mod validate;
mod views;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{NoteStatus, SessionStatus};

pub use assessment::{
    GoalAssessment, MilestoneAssessment, StrategyToggle, DEFAULT_MILESTONE_RATING, MAX_RATING,
    MAX_STRATEGIES,
};
pub use attendees::PresentAllies;
pub use error::{DraftError, ItemKind, ReasonCode};
pub use product::ProductLine;
pub use validate::ValidationIssue;
pub use views::{available_goals, available_products, InactivePlanPolicy};

/// Duration used when nothing else is configured.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Rating every observation scale starts at.
pub const DEFAULT_NOTE_RATING: i32 = 5;

/// Session metadata entered on the first tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFields {
    pub client_id: Option<i64>,
    pub session_date_time: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub location: String,
    pub title: String,
    pub description: String,
    pub status: SessionStatus,
}

impl SessionFields {
    fn new(client_id: Option<i64>, duration_minutes: u32) -> Self {
        Self {
            client_id,
            session_date_time: None,
            duration_minutes,
            location: String::new(),
            title: String::new(),
            description: String::new(),
            status: SessionStatus::default(),
        }
    }
}

/// Observation scales, each expected in `0..=10`.
///
/// These are raw form values; range checking happens in
/// [`SessionDraft::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratings {
    pub mood: i32,
    pub focus: i32,
    pub cooperation: i32,
    pub physical_activity: i32,
}

impl Default for Ratings {
    fn default() -> Self {
        Self {
            mood: DEFAULT_NOTE_RATING,
            focus: DEFAULT_NOTE_RATING,
            cooperation: DEFAULT_NOTE_RATING,
            physical_activity: DEFAULT_NOTE_RATING,
        }
    }
}

/// The session note: attendees, ratings, free text and products used.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteFields {
    pub ratings: Ratings,
    pub free_text_notes: String,
    pub status: NoteStatus,
    attendees: PresentAllies,
    products: Vec<ProductLine>,
}

impl NoteFields {
    /// Allies recorded as present.
    pub const fn attendees(&self) -> &PresentAllies {
        &self.attendees
    }

    /// Product lines in the order they were added.
    pub fn products(&self) -> &[ProductLine] {
        &self.products
    }
}

/// Root aggregate for a session being composed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDraft {
    draft_id: Uuid,
    pub session: SessionFields,
    pub note: NoteFields,
    assessments: Vec<GoalAssessment>,
    /// Goal the milestone picker works against; transient UI context.
    active_goal_id: Option<i64>,
}

impl SessionDraft {
    /// Create an empty draft with default values.
    pub fn new() -> Self {
        Self::with_defaults(None, DEFAULT_DURATION_MINUTES)
    }

    /// Create a draft seeded with a client.
    pub fn for_client(client_id: i64) -> Self {
        Self::with_defaults(Some(client_id), DEFAULT_DURATION_MINUTES)
    }

    /// Create a draft with an optional client and a default duration.
    pub fn with_defaults(client_id: Option<i64>, duration_minutes: u32) -> Self {
        Self {
            draft_id: Uuid::now_v7(),
            session: SessionFields::new(client_id, duration_minutes),
            note: NoteFields::default(),
            assessments: Vec::new(),
            active_goal_id: None,
        }
    }

    /// Identifier used to correlate log lines for this draft.
    pub const fn draft_id(&self) -> Uuid {
        self.draft_id
    }

    /// Goal assessments in selection order.
    pub fn assessments(&self) -> &[GoalAssessment] {
        &self.assessments
    }

    /// Goal most recently added, if it is still part of the draft.
    pub const fn active_goal_id(&self) -> Option<i64> {
        self.active_goal_id
    }

    /// Position of the active goal within [`Self::assessments`].
    pub fn active_goal_index(&self) -> Option<usize> {
        let goal_id = self.active_goal_id?;
        self.assessments.iter().position(|a| a.goal_id() == goal_id)
    }

    /// Make an already-selected goal the active one.
    ///
    /// # Errors
    ///
    /// `NotFound` if `goal_index` is out of range.
    pub fn set_active_goal(&mut self, goal_index: usize) -> Result<(), DraftError> {
        let goal_id = self.goal_at(goal_index)?.goal_id();
        self.active_goal_id = Some(goal_id);
        Ok(())
    }

    /// Discard everything and start again from defaults.
    pub fn reset(&mut self, client_id: Option<i64>, duration_minutes: u32) {
        *self = Self::with_defaults(client_id, duration_minutes);
    }

    fn goal_at(&self, goal_index: usize) -> Result<&GoalAssessment, DraftError> {
        self.assessments
            .get(goal_index)
            .ok_or_else(|| DraftError::not_found(ItemKind::Goal, goal_index))
    }

    fn goal_at_mut(&mut self, goal_index: usize) -> Result<&mut GoalAssessment, DraftError> {
        self.assessments
            .get_mut(goal_index)
            .ok_or_else(|| DraftError::not_found(ItemKind::Goal, goal_index))
    }
}

impl Default for SessionDraft {
    fn default() -> Self {
        Self::new()
    }
}
