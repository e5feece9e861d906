//! Read-only views derived from a draft and reference data.

use serde::{Deserialize, Serialize};

use super::SessionDraft;
use crate::models::{BudgetItem, BudgetSettings, Goal};

/// What the product picker offers when a client has no active budget plan.
/// Set from `[products] inactive_plan` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InactivePlanPolicy {
    /// Offer nothing.
    #[default]
    ShowNone,
    /// Offer every in-stock budget item belonging to the client.
    ShowAll,
}

impl SessionDraft {
    /// Goal id of every assessment, in selection order.
    pub fn selected_goal_ids(&self) -> Vec<i64> {
        self.assessments.iter().map(|a| a.goal_id()).collect()
    }

    /// Milestone ids selected under `goal_id`; empty if the goal is not
    /// part of the draft.
    pub fn selected_milestone_ids(&self, goal_id: i64) -> Vec<i64> {
        self.assessments
            .iter()
            .find(|a| a.goal_id() == goal_id)
            .map(|a| a.milestones().iter().map(|m| m.milestone_id()).collect())
            .unwrap_or_default()
    }
}

/// Goals not yet selected in `draft`.
pub fn available_goals<'a>(all_goals: &'a [Goal], draft: &SessionDraft) -> Vec<&'a Goal> {
    let selected = draft.selected_goal_ids();
    all_goals
        .iter()
        .filter(|g| !selected.contains(&g.id))
        .collect()
}

/// Budget items the client can draw on in this session.
///
/// With an active plan, only items of that plan with units remaining are
/// offered. The item's `quantity` becomes the availability snapshot when a
/// line is added.
pub fn available_products<'a>(
    items: &'a [BudgetItem],
    settings: Option<&BudgetSettings>,
    client_id: i64,
    policy: InactivePlanPolicy,
) -> Vec<&'a BudgetItem> {
    let in_stock = |item: &&BudgetItem| item.client_id == client_id && item.quantity > 0.0;

    match settings.filter(|s| s.is_active && s.client_id == client_id) {
        Some(plan) => items
            .iter()
            .filter(in_stock)
            .filter(|item| item.budget_settings_id == plan.id)
            .collect(),
        None => match policy {
            InactivePlanPolicy::ShowNone => Vec::new(),
            InactivePlanPolicy::ShowAll => items.iter().filter(in_stock).collect(),
        },
    }
}
