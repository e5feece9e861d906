//! `reqwest` implementation of [`PracticeApi`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{
    ApiError, AssessmentRoute, AssessmentTarget, CreatedRecord, NewAssessment, NewSession,
    NewSessionNote, PracticeApi, RecordId,
};
use crate::config::ApiConfig;
use crate::models::{
    Ally, BudgetItem, BudgetSettings, Client, Goal, SessionRecord, Strategy, Subgoal,
};

/// HTTP client for the practice API.
#[derive(Debug, Clone)]
pub struct HttpPracticeApi {
    client: reqwest::Client,
    base_url: String,
    assessment_route: AssessmentRoute,
}

impl HttpPracticeApi {
    /// Build a client from the `[api]` config section.
    ///
    /// # Errors
    ///
    /// `ApiError::Client` if the TLS backend cannot be initialised.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            assessment_route: config.assessment_route,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                path: path.to_string(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(ApiError::Status {
                path: path.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.json().await.map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn post_json<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<CreatedRecord, ApiError> {
        debug!(path, "POST");
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json().await.map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PracticeApi for HttpPracticeApi {
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        self.get_json("/api/clients").await
    }

    async fn list_allies(&self, client_id: i64) -> Result<Vec<Ally>, ApiError> {
        self.get_json(&format!("/api/clients/{client_id}/allies"))
            .await
    }

    async fn list_goals(&self, client_id: i64) -> Result<Vec<Goal>, ApiError> {
        self.get_json(&format!("/api/clients/{client_id}/goals"))
            .await
    }

    async fn list_subgoals(&self, goal_id: i64) -> Result<Vec<Subgoal>, ApiError> {
        self.get_json(&format!("/api/goals/{goal_id}/subgoals"))
            .await
    }

    async fn budget_settings(&self, client_id: i64) -> Result<Option<BudgetSettings>, ApiError> {
        match self
            .get_json::<Option<BudgetSettings>>(&format!(
                "/api/clients/{client_id}/budget-settings"
            ))
            .await
        {
            Err(e) if e.is_not_found() => Ok(None),
            other => other,
        }
    }

    async fn list_budget_items(&self, client_id: i64) -> Result<Vec<BudgetItem>, ApiError> {
        self.get_json(&format!("/api/clients/{client_id}/budget-items"))
            .await
    }

    async fn list_strategies(&self) -> Result<Vec<Strategy>, ApiError> {
        self.get_json("/api/strategies").await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, ApiError> {
        self.get_json("/api/sessions").await
    }

    async fn create_session(&self, session: &NewSession) -> Result<CreatedRecord, ApiError> {
        self.post_json("/api/sessions", session).await
    }

    async fn create_note(
        &self,
        session_id: &RecordId,
        note: &NewSessionNote,
    ) -> Result<CreatedRecord, ApiError> {
        self.post_json(&format!("/api/sessions/{session_id}/notes"), note)
            .await
    }

    async fn create_assessment(
        &self,
        target: &AssessmentTarget,
        assessment: &NewAssessment,
    ) -> Result<CreatedRecord, ApiError> {
        self.post_json(&self.assessment_route.path(target), assessment)
            .await
    }
}
