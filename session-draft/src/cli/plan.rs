//! JSON plan describing a session to compose.
//!
//! ```json
//! {
//!   "clientId": 1,
//!   "date": "2026-03-02T09:30:00Z",
//!   "title": "Articulation block",
//!   "ratings": { "mood": 7 },
//!   "attendees": [3],
//!   "products": [{ "budgetItemId": 9001, "quantity": 2 }],
//!   "goals": [
//!     { "goalId": 24, "milestones": [{ "milestoneId": 101, "rating": 7, "strategies": ["Modeling"] }] }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::PracticeApi;
use crate::dialog::SessionDialog;
use crate::models::{NoteStatus, SessionStatus};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPlan {
    pub client_id: i64,
    pub date: DateTime<Utc>,
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub ratings: PlanRatings,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub note_status: NoteStatus,
    #[serde(default)]
    pub attendees: Vec<i64>,
    #[serde(default)]
    pub products: Vec<PlanProduct>,
    #[serde(default)]
    pub goals: Vec<PlanGoal>,
}

/// Ratings left out keep the draft default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRatings {
    pub mood: Option<i32>,
    pub focus: Option<i32>,
    pub cooperation: Option<i32>,
    pub physical_activity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProduct {
    pub budget_item_id: i64,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanGoal {
    pub goal_id: i64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub milestones: Vec<PlanMilestone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMilestone {
    pub milestone_id: i64,
    pub rating: Option<i32>,
    #[serde(default)]
    pub strategies: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl DraftPlan {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse plan {}", path.display()))
    }

    /// Replay the plan through the dialog's pickers.
    ///
    /// Stops at the first selection the dialog refuses.
    pub async fn apply<A: PracticeApi>(&self, dialog: &mut SessionDialog<A>) -> Result<()> {
        dialog.set_client(self.client_id);
        {
            let draft = dialog.draft_mut();
            let session = &mut draft.session;
            session.session_date_time = Some(self.date);
            if let Some(minutes) = self.duration_minutes {
                session.duration_minutes = minutes;
            }
            session.location.clone_from(&self.location);
            session.title.clone_from(&self.title);
            session.description.clone_from(&self.description);
            session.status = self.status;

            let note = &mut draft.note;
            let ratings = &mut note.ratings;
            for (slot, value) in [
                (&mut ratings.mood, self.ratings.mood),
                (&mut ratings.focus, self.ratings.focus),
                (&mut ratings.cooperation, self.ratings.cooperation),
                (&mut ratings.physical_activity, self.ratings.physical_activity),
            ] {
                if let Some(value) = value {
                    *slot = value;
                }
            }
            note.free_text_notes.clone_from(&self.notes);
            note.status = self.note_status;
        }

        for ally_id in &self.attendees {
            dialog
                .choose_attendee(*ally_id)
                .await
                .with_context(|| format!("attendee {ally_id}"))?;
        }

        for product in &self.products {
            dialog
                .choose_product(product.budget_item_id, product.quantity)
                .await
                .with_context(|| format!("product {}", product.budget_item_id))?;
        }

        for goal in &self.goals {
            let gi = dialog
                .choose_goal(goal.goal_id)
                .await
                .with_context(|| format!("goal {}", goal.goal_id))?;
            dialog.draft_mut().set_goal_notes(gi, goal.notes.as_str())?;

            for milestone in &goal.milestones {
                let mi = dialog
                    .choose_milestone(gi, milestone.milestone_id)
                    .await
                    .with_context(|| format!("milestone {}", milestone.milestone_id))?;
                let draft = dialog.draft_mut();
                if let Some(rating) = milestone.rating {
                    draft.set_rating(gi, mi, rating)?;
                }
                draft.set_milestone_notes(gi, mi, milestone.notes.as_str())?;

                for name in &milestone.strategies {
                    dialog
                        .choose_strategy(gi, mi, name)
                        .await
                        .with_context(|| format!("strategy {name:?}"))?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::testing::FixtureApi;

    const PLAN: &str = r#"{
        "clientId": 1,
        "date": "2026-03-02T09:30:00Z",
        "durationMinutes": 45,
        "title": "Articulation block",
        "status": "completed",
        "ratings": { "mood": 7, "physicalActivity": 3 },
        "notes": "Good focus after the break.",
        "attendees": [3],
        "products": [{ "budgetItemId": 9001, "quantity": 2 }],
        "goals": [
            {
                "goalId": 24,
                "notes": "Steady progress",
                "milestones": [
                    { "milestoneId": 101, "rating": 12, "strategies": ["Modeling", "Visual cues"] }
                ]
            },
            { "goalId": 25 }
        ]
    }"#;

    #[tokio::test]
    async fn test_plan_builds_draft() {
        let plan: DraftPlan = serde_json::from_str(PLAN).unwrap();
        let mut dialog = SessionDialog::open(FixtureApi::sample(), &AppConfig::default(), None);

        plan.apply(&mut dialog).await.unwrap();

        let draft = dialog.draft();
        assert_eq!(draft.session.client_id, Some(1));
        assert_eq!(draft.session.duration_minutes, 45);
        assert_eq!(draft.session.status, SessionStatus::Completed);
        assert_eq!(draft.note.ratings.mood, 7);
        assert_eq!(draft.note.ratings.focus, 5);
        assert_eq!(draft.note.ratings.physical_activity, 3);
        assert_eq!(draft.note.attendees().ids(), [3]);
        assert_eq!(draft.note.products().len(), 1);

        let goals = draft.assessments();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].notes(), "Steady progress");
        let milestone = &goals[0].milestones()[0];
        assert_eq!(milestone.rating(), 10);
        assert_eq!(milestone.strategies(), ["Modeling", "Visual cues"]);
        assert!(goals[1].milestones().is_empty());
        assert!(draft.validate().is_ok());
    }

    #[tokio::test]
    async fn test_plan_stops_at_refused_selection() {
        let plan: DraftPlan = serde_json::from_str(
            r#"{ "clientId": 1, "date": "2026-03-02T09:30:00Z",
                 "products": [{ "budgetItemId": 9002, "quantity": 5 }] }"#,
        )
        .unwrap();
        let mut dialog = SessionDialog::open(FixtureApi::sample(), &AppConfig::default(), None);

        let err = plan.apply(&mut dialog).await.unwrap_err();
        assert!(err.to_string().contains("product 9002"));
        assert!(dialog.draft().note.products().is_empty());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, PLAN).unwrap();

        let plan = DraftPlan::load(&path).unwrap();
        assert_eq!(plan.goals.len(), 2);
        assert!(DraftPlan::load(&dir.path().join("missing.json")).is_err());
    }
}
