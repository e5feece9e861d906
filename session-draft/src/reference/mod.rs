//! Read-through cache of reference data fetched from the practice API.
//!
//! Lookups are keyed by client id or goal id. A failed fetch is logged and
//! reads as an empty list; nothing is stored, so the next read retries.
//! Callers only ever get shared slices back.

use std::collections::HashMap;
use std::future::Future;

use tracing::{debug, warn};

use crate::api::{ApiError, PracticeApi};
use crate::models::{
    Ally, BudgetItem, BudgetSettings, Client, Goal, SessionRecord, Strategy, Subgoal,
};

/// Reference data for one open dialog.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    clients: Option<Vec<Client>>,
    strategies: Option<Vec<Strategy>>,
    sessions: Option<Vec<SessionRecord>>,
    allies: HashMap<i64, Vec<Ally>>,
    goals: HashMap<i64, Vec<Goal>>,
    subgoals: HashMap<i64, Vec<Subgoal>>,
    budget_settings: HashMap<i64, Option<BudgetSettings>>,
    budget_items: HashMap<i64, Vec<BudgetItem>>,
}

/// Fetch into `slot` on a miss.
async fn fill<T, F>(slot: &mut Option<T>, what: &str, fetch: F)
where
    F: Future<Output = Result<T, ApiError>>,
{
    if slot.is_some() {
        debug!(what, "cache hit");
        return;
    }
    match fetch.await {
        Ok(value) => *slot = Some(value),
        Err(e) => warn!(what, error = %e, "reference fetch failed; showing empty state"),
    }
}

/// Keyed variant of [`fill`].
async fn fill_keyed<'a, T, F>(
    map: &'a mut HashMap<i64, T>,
    key: i64,
    what: &str,
    fetch: F,
) -> Option<&'a T>
where
    F: Future<Output = Result<T, ApiError>>,
{
    if !map.contains_key(&key) {
        match fetch.await {
            Ok(value) => {
                map.insert(key, value);
            }
            Err(e) => {
                warn!(what, key, error = %e, "reference fetch failed; showing empty state");
                return None;
            }
        }
    } else {
        debug!(what, key, "cache hit");
    }
    map.get(&key)
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn clients(&mut self, api: &dyn PracticeApi) -> &[Client] {
        fill(&mut self.clients, "clients", api.list_clients()).await;
        self.clients.as_deref().unwrap_or_default()
    }

    pub async fn strategies(&mut self, api: &dyn PracticeApi) -> &[Strategy] {
        fill(&mut self.strategies, "strategies", api.list_strategies()).await;
        self.strategies.as_deref().unwrap_or_default()
    }

    pub async fn sessions(&mut self, api: &dyn PracticeApi) -> &[SessionRecord] {
        fill(&mut self.sessions, "sessions", api.list_sessions()).await;
        self.sessions.as_deref().unwrap_or_default()
    }

    pub async fn allies(&mut self, api: &dyn PracticeApi, client_id: i64) -> &[Ally] {
        fill_keyed(&mut self.allies, client_id, "allies", api.list_allies(client_id))
            .await
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub async fn goals(&mut self, api: &dyn PracticeApi, client_id: i64) -> &[Goal] {
        fill_keyed(&mut self.goals, client_id, "goals", api.list_goals(client_id))
            .await
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub async fn subgoals(&mut self, api: &dyn PracticeApi, goal_id: i64) -> &[Subgoal] {
        fill_keyed(&mut self.subgoals, goal_id, "subgoals", api.list_subgoals(goal_id))
            .await
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub async fn budget_settings(
        &mut self,
        api: &dyn PracticeApi,
        client_id: i64,
    ) -> Option<&BudgetSettings> {
        fill_keyed(
            &mut self.budget_settings,
            client_id,
            "budget settings",
            api.budget_settings(client_id),
        )
        .await
        .and_then(Option::as_ref)
    }

    pub async fn budget_items(&mut self, api: &dyn PracticeApi, client_id: i64) -> &[BudgetItem] {
        fill_keyed(
            &mut self.budget_items,
            client_id,
            "budget items",
            api.list_budget_items(client_id),
        )
        .await
        .map(Vec::as_slice)
        .unwrap_or_default()
    }

    /// Drop everything cached for a client.
    pub fn invalidate_client(&mut self, client_id: i64) {
        self.allies.remove(&client_id);
        self.goals.remove(&client_id);
        self.budget_settings.remove(&client_id);
        self.budget_items.remove(&client_id);
    }

    pub fn invalidate_goal(&mut self, goal_id: i64) {
        self.subgoals.remove(&goal_id);
    }

    /// Force the session list to be refetched, e.g. after a submission.
    pub fn invalidate_sessions(&mut self) {
        self.sessions = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixtureApi;

    #[tokio::test]
    async fn test_fetches_once_per_key() {
        let api = FixtureApi::sample();
        let mut cache = ReferenceCache::new();

        assert_eq!(cache.goals(&api, 1).await.len(), 2);
        assert_eq!(cache.goals(&api, 1).await.len(), 2);
        assert_eq!(api.call_count("list_goals"), 1);

        cache.invalidate_client(1);
        cache.goals(&api, 1).await;
        assert_eq!(api.call_count("list_goals"), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_empty_and_retried() {
        let api = FixtureApi::sample();
        api.fail_reads(true);
        let mut cache = ReferenceCache::new();

        assert!(cache.allies(&api, 1).await.is_empty());
        assert!(cache.budget_settings(&api, 1).await.is_none());
        assert!(cache.clients(&api).await.is_empty());

        api.fail_reads(false);
        assert_eq!(cache.allies(&api, 1).await.len(), 3);
        assert_eq!(api.call_count("list_allies"), 2);
    }

    #[tokio::test]
    async fn test_sessions_invalidation() {
        let api = FixtureApi::sample();
        let mut cache = ReferenceCache::new();

        cache.sessions(&api).await;
        cache.sessions(&api).await;
        assert_eq!(api.call_count("list_sessions"), 1);

        cache.invalidate_sessions();
        cache.sessions(&api).await;
        assert_eq!(api.call_count("list_sessions"), 2);
    }

    #[tokio::test]
    async fn test_subgoals_keyed_by_goal() {
        let api = FixtureApi::sample();
        let mut cache = ReferenceCache::new();

        let titles: Vec<_> = cache
            .subgoals(&api, 24)
            .await
            .iter()
            .map(|s| s.title.clone())
            .collect();
        assert_eq!(titles, vec!["Produce /s/ in isolation", "Produce /s/ in words"]);
        assert!(cache.subgoals(&api, 999).await.is_empty());

        cache.invalidate_goal(24);
        cache.subgoals(&api, 24).await;
        assert_eq!(api.call_count("list_subgoals"), 3);
    }
}
