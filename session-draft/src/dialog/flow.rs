//! Modal selection flow: goal, milestone, strategy, product and attendee
//! pickers.
//!
//! Exactly one picker can be open at a time. Opening checks that the
//! context the picker needs exists; selecting runs the matching draft
//! operation and closes the picker whether or not the operation succeeded.

use thiserror::Error;
use tracing::{debug, warn};

use crate::draft::{available_goals, DraftError, ItemKind, SessionDraft, StrategyToggle};
use crate::models::{Ally, BudgetItem, Goal, Strategy, Subgoal};

/// The picker kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Goal,
    Milestone,
    Strategy,
    Product,
    Attendee,
}

impl DialogKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Milestone => "milestone",
            Self::Strategy => "strategy",
            Self::Product => "product",
            Self::Attendee => "attendee",
        }
    }

    /// Message shown instead of an empty list.
    pub const fn empty_state(self) -> &'static str {
        match self {
            Self::Goal => "All of this client's goals are already in this session.",
            Self::Milestone => "Every milestone for this goal has already been added.",
            Self::Strategy => "No strategies are available.",
            Self::Product => "No products are available from the client's budget plan.",
            Self::Attendee => "No other allies are available for this client.",
        }
    }
}

impl std::fmt::Display for DialogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An open picker and the draft entries it works against.
///
/// Entries are held by id and resolved to positions on selection, so edits
/// to the draft while a picker is open cannot redirect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenDialog {
    Goal,
    Milestone {
        goal_id: i64,
    },
    Strategy {
        goal_id: i64,
        milestone_id: i64,
    },
    Product,
    Attendee,
}

impl OpenDialog {
    pub const fn kind(self) -> DialogKind {
        match self {
            Self::Goal => DialogKind::Goal,
            Self::Milestone { .. } => DialogKind::Milestone,
            Self::Strategy { .. } => DialogKind::Strategy,
            Self::Product => DialogKind::Product,
            Self::Attendee => DialogKind::Attendee,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open(OpenDialog),
}

/// A picker could not be opened or used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    #[error("the {0} picker is already open")]
    DialogAlreadyOpen(DialogKind),

    #[error("the {0} picker is not open")]
    NotOpen(DialogKind),

    #[error("select a client before adding a {0}")]
    MissingClient(DialogKind),

    #[error("the {kind} picker needs a selected goal/milestone at that position")]
    MissingContext { kind: DialogKind },

    #[error(transparent)]
    Draft(#[from] DraftError),
}

/// The dialog state machine.
#[derive(Debug, Default)]
pub struct SelectionFlow {
    state: DialogState,
}

impl SelectionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> DialogState {
        self.state
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    fn open(&mut self, dialog: OpenDialog) -> Result<(), FlowError> {
        if let DialogState::Open(current) = self.state {
            return Err(FlowError::DialogAlreadyOpen(current.kind()));
        }
        debug!(picker = %dialog.kind(), "picker opened");
        self.state = DialogState::Open(dialog);
        Ok(())
    }

    fn require_client(draft: &SessionDraft, kind: DialogKind) -> Result<(), FlowError> {
        if draft.session.client_id.is_none() {
            return Err(FlowError::MissingClient(kind));
        }
        Ok(())
    }

    pub fn open_goal(&mut self, draft: &SessionDraft) -> Result<(), FlowError> {
        Self::require_client(draft, DialogKind::Goal)?;
        self.open(OpenDialog::Goal)
    }

    /// Open the milestone picker for the goal at `goal_index`, or for the
    /// draft's active goal when `None`.
    pub fn open_milestone(
        &mut self,
        draft: &SessionDraft,
        goal_index: Option<usize>,
    ) -> Result<(), FlowError> {
        let goal_id = goal_index
            .or_else(|| draft.active_goal_index())
            .and_then(|i| draft.assessments().get(i))
            .map(|g| g.goal_id())
            .ok_or(FlowError::MissingContext {
                kind: DialogKind::Milestone,
            })?;
        self.open(OpenDialog::Milestone { goal_id })
    }

    pub fn open_strategy(
        &mut self,
        draft: &SessionDraft,
        goal_index: usize,
        milestone_index: usize,
    ) -> Result<(), FlowError> {
        let goal = draft.assessments().get(goal_index);
        let Some((goal_id, milestone_id)) = goal.and_then(|g| {
            g.milestones()
                .get(milestone_index)
                .map(|m| (g.goal_id(), m.milestone_id()))
        }) else {
            return Err(FlowError::MissingContext {
                kind: DialogKind::Strategy,
            });
        };
        self.open(OpenDialog::Strategy {
            goal_id,
            milestone_id,
        })
    }

    pub fn open_product(&mut self, draft: &SessionDraft) -> Result<(), FlowError> {
        Self::require_client(draft, DialogKind::Product)?;
        self.open(OpenDialog::Product)
    }

    pub fn open_attendee(&mut self, draft: &SessionDraft) -> Result<(), FlowError> {
        Self::require_client(draft, DialogKind::Attendee)?;
        self.open(OpenDialog::Attendee)
    }

    /// Close without selecting anything.
    pub fn cancel(&mut self) {
        if let DialogState::Open(dialog) = self.state {
            debug!(picker = %dialog.kind(), "picker cancelled");
        }
        self.state = DialogState::Closed;
    }

    /// Take the open dialog if it is of `kind`, closing the flow.
    fn take(&mut self, kind: DialogKind) -> Result<OpenDialog, FlowError> {
        match self.state {
            DialogState::Open(dialog) if dialog.kind() == kind => {
                self.state = DialogState::Closed;
                Ok(dialog)
            }
            _ => Err(FlowError::NotOpen(kind)),
        }
    }

    pub fn select_goal(&mut self, draft: &mut SessionDraft, goal: &Goal) -> Result<usize, FlowError> {
        self.take(DialogKind::Goal)?;
        draft.add_goal(goal).map_err(conflict)
    }

    pub fn select_milestone(
        &mut self,
        draft: &mut SessionDraft,
        milestone: &Subgoal,
    ) -> Result<usize, FlowError> {
        let OpenDialog::Milestone { goal_id } = self.take(DialogKind::Milestone)? else {
            return Err(FlowError::NotOpen(DialogKind::Milestone));
        };
        let goal_index = goal_position(draft, goal_id)?;
        draft.add_milestone(goal_index, milestone).map_err(conflict)
    }

    pub fn select_strategy(
        &mut self,
        draft: &mut SessionDraft,
        strategy: &Strategy,
    ) -> Result<StrategyToggle, FlowError> {
        let OpenDialog::Strategy {
            goal_id,
            milestone_id,
        } = self.take(DialogKind::Strategy)?
        else {
            return Err(FlowError::NotOpen(DialogKind::Strategy));
        };
        let goal_index = goal_position(draft, goal_id)?;
        let milestone_index = draft.assessments()[goal_index]
            .milestones()
            .iter()
            .position(|m| m.milestone_id() == milestone_id)
            .ok_or_else(|| {
                conflict(DraftError::NotFound {
                    kind: ItemKind::Milestone,
                    key: milestone_id.to_string(),
                })
            })?;
        draft
            .toggle_strategy(goal_index, milestone_index, &strategy.name)
            .map_err(conflict)
    }

    pub fn select_product(
        &mut self,
        draft: &mut SessionDraft,
        item: &BudgetItem,
        quantity: f64,
    ) -> Result<usize, FlowError> {
        self.take(DialogKind::Product)?;
        draft.add_product(item, quantity).map_err(conflict)
    }

    pub fn select_attendee(&mut self, draft: &mut SessionDraft, ally: &Ally) -> Result<(), FlowError> {
        self.take(DialogKind::Attendee)?;
        draft.add_present_ally(ally.id, &ally.name).map_err(conflict)
    }
}

/// Current position of the assessment for `goal_id`.
fn goal_position(draft: &SessionDraft, goal_id: i64) -> Result<usize, FlowError> {
    draft
        .assessments()
        .iter()
        .position(|g| g.goal_id() == goal_id)
        .ok_or_else(|| {
            conflict(DraftError::NotFound {
                kind: ItemKind::Goal,
                key: goal_id.to_string(),
            })
        })
}

fn conflict(e: DraftError) -> FlowError {
    warn!(code = %e.code(), error = %e, "selection refused");
    FlowError::Draft(e)
}

/// Goals the goal picker offers.
pub fn goal_candidates<'a>(goals: &'a [Goal], draft: &SessionDraft) -> Vec<&'a Goal> {
    available_goals(goals, draft)
}

/// Milestones of the goal at `goal_index` that are not selected yet.
pub fn milestone_candidates<'a>(
    subgoals: &'a [Subgoal],
    draft: &SessionDraft,
    goal_index: usize,
) -> Vec<&'a Subgoal> {
    let Some(goal) = draft.assessments().get(goal_index) else {
        return Vec::new();
    };
    let selected = draft.selected_milestone_ids(goal.goal_id());
    subgoals
        .iter()
        .filter(|s| s.goal_id == goal.goal_id() && !selected.contains(&s.id))
        .collect()
}

/// Strategies not yet applied to the milestone. Empty once the milestone
/// holds the maximum number of strategies.
pub fn strategy_candidates<'a>(
    strategies: &'a [Strategy],
    draft: &SessionDraft,
    goal_index: usize,
    milestone_index: usize,
) -> Vec<&'a Strategy> {
    let Some(milestone) = draft
        .assessments()
        .get(goal_index)
        .and_then(|g| g.milestones().get(milestone_index))
    else {
        return Vec::new();
    };
    if milestone.strategies().len() >= crate::draft::MAX_STRATEGIES {
        return Vec::new();
    }
    strategies
        .iter()
        .filter(|s| !milestone.has_strategy(&s.name))
        .collect()
}

/// Offered products (see [`crate::draft::available_products`]) minus those
/// already on the note.
pub fn product_candidates<'a>(
    available: &[&'a BudgetItem],
    draft: &SessionDraft,
) -> Vec<&'a BudgetItem> {
    let lines = draft.note.products();
    available
        .iter()
        .copied()
        .filter(|item| {
            !lines
                .iter()
                .any(|l| l.budget_item_id() == item.id || l.product_code() == item.item_code)
        })
        .collect()
}

/// Non-archived allies not yet recorded as present.
pub fn attendee_candidates<'a>(allies: &'a [Ally], draft: &SessionDraft) -> Vec<&'a Ally> {
    let present = draft.note.attendees();
    allies
        .iter()
        .filter(|a| !a.archived && !present.contains(a.id))
        .collect()
}
