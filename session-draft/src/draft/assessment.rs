//! Goal and milestone performance assessments.

use tracing::debug;

use super::{DraftError, ItemKind, SessionDraft};
use crate::models::{Goal, Subgoal};

/// Most strategies that can be recorded against one milestone.
pub const MAX_STRATEGIES: usize = 5;

/// Rating a newly added milestone starts at.
pub const DEFAULT_MILESTONE_RATING: u8 = 5;

/// Upper bound of every rating scale.
pub const MAX_RATING: u8 = 10;

/// Performance assessment for one goal in this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalAssessment {
    goal_id: i64,
    goal_title: String,
    notes: String,
    milestones: Vec<MilestoneAssessment>,
}

impl GoalAssessment {
    fn new(goal: &Goal) -> Self {
        Self {
            goal_id: goal.id,
            goal_title: goal.title.clone(),
            notes: String::new(),
            milestones: Vec::new(),
        }
    }

    pub const fn goal_id(&self) -> i64 {
        self.goal_id
    }

    /// Title cached at selection time for display.
    pub fn goal_title(&self) -> &str {
        &self.goal_title
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn milestones(&self) -> &[MilestoneAssessment] {
        &self.milestones
    }

    fn milestone_at_mut(
        &mut self,
        milestone_index: usize,
    ) -> Result<&mut MilestoneAssessment, DraftError> {
        self.milestones
            .get_mut(milestone_index)
            .ok_or_else(|| DraftError::not_found(ItemKind::Milestone, milestone_index))
    }
}

/// Assessment of a single milestone under a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneAssessment {
    milestone_id: i64,
    milestone_title: String,
    rating: u8,
    strategies: Vec<String>,
    notes: String,
}

impl MilestoneAssessment {
    fn new(milestone: &Subgoal) -> Self {
        Self {
            milestone_id: milestone.id,
            milestone_title: milestone.title.clone(),
            rating: DEFAULT_MILESTONE_RATING,
            strategies: Vec::new(),
            notes: String::new(),
        }
    }

    pub const fn milestone_id(&self) -> i64 {
        self.milestone_id
    }

    pub fn milestone_title(&self) -> &str {
        &self.milestone_title
    }

    /// Rating in `0..=10`.
    pub const fn rating(&self) -> u8 {
        self.rating
    }

    /// Strategy names in the order they were picked. Never more than
    /// [`MAX_STRATEGIES`], never duplicated.
    pub fn strategies(&self) -> &[String] {
        &self.strategies
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn has_strategy(&self, name: &str) -> bool {
        self.strategies.iter().any(|s| s == name)
    }
}

/// What a strategy toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyToggle {
    Added,
    Removed,
    /// The milestone already has [`MAX_STRATEGIES`]; nothing changed.
    Ignored,
}

impl SessionDraft {
    /// Select a goal for assessment and make it the active goal.
    ///
    /// Returns the index of the new assessment.
    ///
    /// # Errors
    ///
    /// `AlreadySelected` if the goal is already part of the draft.
    pub fn add_goal(&mut self, goal: &Goal) -> Result<usize, DraftError> {
        if self.assessments.iter().any(|a| a.goal_id == goal.id) {
            return Err(DraftError::already_selected(ItemKind::Goal, goal.id));
        }

        self.assessments.push(GoalAssessment::new(goal));
        self.active_goal_id = Some(goal.id);
        debug!(draft_id = %self.draft_id, goal_id = goal.id, "goal added");
        Ok(self.assessments.len() - 1)
    }

    /// Drop a goal assessment along with its milestones.
    ///
    /// # Errors
    ///
    /// `NotFound` if `goal_index` is out of range.
    pub fn remove_goal(&mut self, goal_index: usize) -> Result<GoalAssessment, DraftError> {
        self.goal_at(goal_index)?;
        let removed = self.assessments.remove(goal_index);
        if self.active_goal_id == Some(removed.goal_id) {
            self.active_goal_id = None;
        }
        Ok(removed)
    }

    /// Replace the free-text notes of a goal assessment.
    ///
    /// # Errors
    ///
    /// `NotFound` if `goal_index` is out of range.
    pub fn set_goal_notes(
        &mut self,
        goal_index: usize,
        notes: impl Into<String>,
    ) -> Result<(), DraftError> {
        self.goal_at_mut(goal_index)?.notes = notes.into();
        Ok(())
    }

    /// Add a milestone under the goal at `goal_index`, rated
    /// [`DEFAULT_MILESTONE_RATING`] with no strategies.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `goal_index` is out of range, or the milestone
    ///   belongs to a different goal
    /// - `AlreadySelected` if the milestone is already under that goal
    pub fn add_milestone(
        &mut self,
        goal_index: usize,
        milestone: &Subgoal,
    ) -> Result<usize, DraftError> {
        let goal = self.goal_at_mut(goal_index)?;
        if milestone.goal_id != goal.goal_id {
            return Err(DraftError::NotFound {
                kind: ItemKind::Milestone,
                key: milestone.id.to_string(),
            });
        }
        if goal
            .milestones
            .iter()
            .any(|m| m.milestone_id == milestone.id)
        {
            return Err(DraftError::already_selected(
                ItemKind::Milestone,
                milestone.id,
            ));
        }

        goal.milestones.push(MilestoneAssessment::new(milestone));
        Ok(goal.milestones.len() - 1)
    }

    /// # Errors
    ///
    /// `NotFound` if either index is out of range.
    pub fn remove_milestone(
        &mut self,
        goal_index: usize,
        milestone_index: usize,
    ) -> Result<MilestoneAssessment, DraftError> {
        let goal = self.goal_at_mut(goal_index)?;
        goal.milestone_at_mut(milestone_index)?;
        Ok(goal.milestones.remove(milestone_index))
    }

    /// Add or remove a strategy on a milestone.
    ///
    /// Adding a sixth strategy is silently ignored: the picker disables the
    /// control at the limit, so this is not reported as a conflict.
    ///
    /// # Errors
    ///
    /// `NotFound` if either index is out of range.
    pub fn toggle_strategy(
        &mut self,
        goal_index: usize,
        milestone_index: usize,
        name: &str,
    ) -> Result<StrategyToggle, DraftError> {
        let milestone = self
            .goal_at_mut(goal_index)?
            .milestone_at_mut(milestone_index)?;

        if let Some(pos) = milestone.strategies.iter().position(|s| s == name) {
            milestone.strategies.remove(pos);
            return Ok(StrategyToggle::Removed);
        }

        if milestone.strategies.len() >= MAX_STRATEGIES {
            return Ok(StrategyToggle::Ignored);
        }

        milestone.strategies.push(name.to_string());
        Ok(StrategyToggle::Added)
    }

    /// Set a milestone rating, clamped into `0..=10`. Returns the stored value.
    ///
    /// # Errors
    ///
    /// `NotFound` if either index is out of range.
    pub fn set_rating(
        &mut self,
        goal_index: usize,
        milestone_index: usize,
        value: i32,
    ) -> Result<u8, DraftError> {
        let milestone = self
            .goal_at_mut(goal_index)?
            .milestone_at_mut(milestone_index)?;
        let clamped = u8::try_from(value.clamp(0, i32::from(MAX_RATING))).unwrap_or(MAX_RATING);
        milestone.rating = clamped;
        Ok(clamped)
    }

    /// # Errors
    ///
    /// `NotFound` if either index is out of range.
    pub fn set_milestone_notes(
        &mut self,
        goal_index: usize,
        milestone_index: usize,
        notes: impl Into<String>,
    ) -> Result<(), DraftError> {
        self.goal_at_mut(goal_index)?
            .milestone_at_mut(milestone_index)?
            .notes = notes.into();
        Ok(())
    }
}
