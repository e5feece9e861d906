//! Owner of one open "new session" dialog.
//!
//! Holds the draft, the picker flow and the reference cache, and drives the
//! pickers by record id. A successful submit resets the draft.

use tracing::{debug, info};

use super::flow::{
    attendee_candidates, goal_candidates, milestone_candidates, product_candidates,
    strategy_candidates, DialogKind, FlowError, SelectionFlow,
};
use crate::api::PracticeApi;
use crate::config::AppConfig;
use crate::draft::{
    available_products, DraftError, InactivePlanPolicy, ItemKind, SessionDraft, StrategyToggle,
};
use crate::models::{Ally, BudgetItem, Client, Goal, SessionRecord, Strategy, Subgoal};
use crate::reference::ReferenceCache;
use crate::submit::{submit, SubmissionReceipt, SubmitError, SubmitOptions};

/// One open "new session" dialog.
///
/// Owns the draft for as long as the dialog is open. Pickers are driven by
/// id: `choose_*` opens the matching picker, resolves the id against the
/// cached reference data and selects it, so the flow is always closed when
/// the call returns.
pub struct SessionDialog<A> {
    api: A,
    draft: SessionDraft,
    flow: SelectionFlow,
    cache: ReferenceCache,
    initial_client: Option<i64>,
    duration_minutes: u32,
    inactive_plan: InactivePlanPolicy,
    submit_options: SubmitOptions,
}

fn unknown(kind: ItemKind, id: impl ToString) -> FlowError {
    FlowError::Draft(DraftError::NotFound {
        kind,
        key: id.to_string(),
    })
}

impl<A: PracticeApi> SessionDialog<A> {
    pub fn open(api: A, config: &AppConfig, initial_client: Option<i64>) -> Self {
        let duration_minutes = config.session.default_duration_minutes;
        let draft = SessionDraft::with_defaults(initial_client, duration_minutes);
        debug!(draft_id = %draft.draft_id(), client_id = ?initial_client, "dialog opened");
        Self {
            api,
            draft,
            flow: SelectionFlow::new(),
            cache: ReferenceCache::new(),
            initial_client,
            duration_minutes,
            inactive_plan: config.products.inactive_plan,
            submit_options: SubmitOptions::from_config(config),
        }
    }

    pub const fn draft(&self) -> &SessionDraft {
        &self.draft
    }

    /// Direct access for free-form fields (date, title, ratings, notes).
    pub fn draft_mut(&mut self) -> &mut SessionDraft {
        &mut self.draft
    }

    pub const fn flow(&self) -> &SelectionFlow {
        &self.flow
    }

    pub fn cancel_picker(&mut self) {
        self.flow.cancel();
    }

    fn client(&self, kind: DialogKind) -> Result<i64, FlowError> {
        self.draft
            .session
            .client_id
            .ok_or(FlowError::MissingClient(kind))
    }

    /// Switch the draft to another client.
    ///
    /// Goals, products and attendees belong to the previous client and are
    /// dropped; session fields, ratings and notes are kept.
    pub fn set_client(&mut self, client_id: i64) {
        if self.draft.session.client_id == Some(client_id) {
            return;
        }
        self.flow.cancel();
        let session = self.draft.session.clone();
        let ratings = self.draft.note.ratings;
        let notes = std::mem::take(&mut self.draft.note.free_text_notes);
        let status = self.draft.note.status;

        self.draft.reset(Some(client_id), self.duration_minutes);
        self.draft.session = session;
        self.draft.session.client_id = Some(client_id);
        self.draft.note.ratings = ratings;
        self.draft.note.free_text_notes = notes;
        self.draft.note.status = status;
        debug!(draft_id = %self.draft.draft_id(), client_id, "client changed");
    }

    pub async fn clients(&mut self) -> Vec<Client> {
        self.cache.clients(&self.api).await.to_vec()
    }

    pub async fn recent_sessions(&mut self) -> Vec<SessionRecord> {
        self.cache.sessions(&self.api).await.to_vec()
    }

    /// Every milestone defined for a goal, selected or not.
    pub async fn milestones_of(&mut self, goal_id: i64) -> Vec<Subgoal> {
        self.cache.subgoals(&self.api, goal_id).await.to_vec()
    }

    pub async fn strategy_catalogue(&mut self) -> Vec<Strategy> {
        self.cache.strategies(&self.api).await.to_vec()
    }

    pub async fn goal_options(&mut self) -> Vec<Goal> {
        let Some(client_id) = self.draft.session.client_id else {
            return Vec::new();
        };
        let goals = self.cache.goals(&self.api, client_id).await;
        goal_candidates(goals, &self.draft)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn milestone_options(&mut self, goal_index: usize) -> Vec<Subgoal> {
        let Some(goal_id) = self.draft.assessments().get(goal_index).map(|g| g.goal_id()) else {
            return Vec::new();
        };
        let subgoals = self.cache.subgoals(&self.api, goal_id).await;
        milestone_candidates(subgoals, &self.draft, goal_index)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn strategy_options(
        &mut self,
        goal_index: usize,
        milestone_index: usize,
    ) -> Vec<Strategy> {
        let strategies = self.cache.strategies(&self.api).await;
        strategy_candidates(strategies, &self.draft, goal_index, milestone_index)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn product_options(&mut self) -> Vec<BudgetItem> {
        let Some(client_id) = self.draft.session.client_id else {
            return Vec::new();
        };
        let offered = self.offered_products(client_id).await;
        product_candidates(&offered.iter().collect::<Vec<_>>(), &self.draft)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn attendee_options(&mut self) -> Vec<Ally> {
        let Some(client_id) = self.draft.session.client_id else {
            return Vec::new();
        };
        let allies = self.cache.allies(&self.api, client_id).await;
        attendee_candidates(allies, &self.draft)
            .into_iter()
            .cloned()
            .collect()
    }

    async fn offered_products(&mut self, client_id: i64) -> Vec<BudgetItem> {
        let settings = self
            .cache
            .budget_settings(&self.api, client_id)
            .await
            .cloned();
        let items = self.cache.budget_items(&self.api, client_id).await;
        available_products(items, settings.as_ref(), client_id, self.inactive_plan)
            .into_iter()
            .cloned()
            .collect()
    }

    /// # Errors
    ///
    /// `FlowError` if the picker cannot open, the goal is not one of the
    /// client's, or it is already selected.
    pub async fn choose_goal(&mut self, goal_id: i64) -> Result<usize, FlowError> {
        let client_id = self.client(DialogKind::Goal)?;
        self.flow.open_goal(&self.draft)?;
        let goal = self
            .cache
            .goals(&self.api, client_id)
            .await
            .iter()
            .find(|g| g.id == goal_id)
            .cloned();
        let Some(goal) = goal else {
            self.flow.cancel();
            return Err(unknown(ItemKind::Goal, goal_id));
        };
        self.flow.select_goal(&mut self.draft, &goal)
    }

    /// # Errors
    ///
    /// `FlowError` if there is no goal at `goal_index`, the milestone does
    /// not belong to it, or it is already selected.
    pub async fn choose_milestone(
        &mut self,
        goal_index: usize,
        milestone_id: i64,
    ) -> Result<usize, FlowError> {
        self.flow.open_milestone(&self.draft, Some(goal_index))?;
        let Some(goal_id) = self.draft.assessments().get(goal_index).map(|g| g.goal_id()) else {
            self.flow.cancel();
            return Err(unknown(ItemKind::Goal, goal_index));
        };
        let milestone = self
            .cache
            .subgoals(&self.api, goal_id)
            .await
            .iter()
            .find(|s| s.id == milestone_id)
            .cloned();
        let Some(milestone) = milestone else {
            self.flow.cancel();
            return Err(unknown(ItemKind::Milestone, milestone_id));
        };
        self.flow.select_milestone(&mut self.draft, &milestone)
    }

    /// Toggle a catalogue strategy on a milestone.
    ///
    /// # Errors
    ///
    /// `FlowError` if the milestone does not exist or the strategy is not
    /// in the catalogue.
    pub async fn choose_strategy(
        &mut self,
        goal_index: usize,
        milestone_index: usize,
        name: &str,
    ) -> Result<StrategyToggle, FlowError> {
        self.flow
            .open_strategy(&self.draft, goal_index, milestone_index)?;
        let strategy = self
            .cache
            .strategies(&self.api)
            .await
            .iter()
            .find(|s| s.name == name)
            .cloned();
        let Some(strategy) = strategy else {
            self.flow.cancel();
            return Err(unknown(ItemKind::Strategy, name));
        };
        self.flow.select_strategy(&mut self.draft, &strategy)
    }

    /// # Errors
    ///
    /// `FlowError` if the item is not offered for this client, or the
    /// quantity or selection conflicts.
    pub async fn choose_product(
        &mut self,
        budget_item_id: i64,
        quantity: f64,
    ) -> Result<usize, FlowError> {
        let client_id = self.client(DialogKind::Product)?;
        self.flow.open_product(&self.draft)?;
        let item = self
            .offered_products(client_id)
            .await
            .into_iter()
            .find(|i| i.id == budget_item_id);
        let Some(item) = item else {
            self.flow.cancel();
            return Err(unknown(ItemKind::Product, budget_item_id));
        };
        self.flow.select_product(&mut self.draft, &item, quantity)
    }

    /// # Errors
    ///
    /// `FlowError` if the ally is unknown, archived or already present.
    pub async fn choose_attendee(&mut self, ally_id: i64) -> Result<(), FlowError> {
        let client_id = self.client(DialogKind::Attendee)?;
        self.flow.open_attendee(&self.draft)?;
        let ally = self
            .cache
            .allies(&self.api, client_id)
            .await
            .iter()
            .find(|a| a.id == ally_id && !a.archived)
            .cloned();
        let Some(ally) = ally else {
            self.flow.cancel();
            return Err(unknown(ItemKind::Ally, ally_id));
        };
        self.flow.select_attendee(&mut self.draft, &ally)
    }

    /// Submit the draft. On success the session list is refetched on next
    /// read and a fresh draft replaces the submitted one.
    ///
    /// # Errors
    ///
    /// See [`SubmitError`]. The draft is kept as-is on failure.
    pub async fn submit(&mut self) -> Result<SubmissionReceipt, SubmitError> {
        self.flow.cancel();
        let receipt = submit(&self.api, &self.draft, &self.submit_options).await?;
        self.cache.invalidate_sessions();
        info!(draft_id = %self.draft.draft_id(), session_id = %receipt.session_id, "draft submitted");
        self.draft.reset(self.initial_client, self.duration_minutes);
        Ok(receipt)
    }

    /// Throw the draft away and start over.
    pub fn discard(&mut self) {
        self.flow.cancel();
        debug!(draft_id = %self.draft.draft_id(), "draft discarded");
        self.draft.reset(self.initial_client, self.duration_minutes);
    }
}
