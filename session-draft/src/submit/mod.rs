//! Submission of a finished draft.
//!
//! The session is created first, then its note, then every goal assessment
//! concurrently. A failed step stops the sequence; records that were
//! already created stay on the server and are named in the error.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

use crate::api::{
    ApiError, AssessmentTarget, NewAssessment, NewSession, NewSessionNote, PracticeApi, RecordId,
};
use crate::config::AppConfig;
use crate::draft::{SessionDraft, ValidationIssue};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Bound on each individual API call.
    pub timeout: Duration,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SubmitOptions {
    pub const fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout: config.api_timeout(),
        }
    }
}

/// Ids of everything a successful submission created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub session_id: RecordId,
    pub note_id: RecordId,
    /// In the draft's goal order.
    pub assessment_ids: Vec<RecordId>,
}

#[derive(Debug)]
pub struct AssessmentFailure {
    pub goal_id: i64,
    pub error: ApiError,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("draft is not ready to submit: {}", join_issues(.0))]
    Invalid(Vec<ValidationIssue>),

    #[error("failed to create session: {0}")]
    SessionCreate(#[source] ApiError),

    #[error("session {session_id} was created but its note failed: {source}")]
    NoteCreate {
        session_id: RecordId,
        #[source]
        source: ApiError,
    },

    #[error(
        "session {session_id} and note {note_id} were created but {} goal assessment(s) failed",
        .failures.len()
    )]
    Assessments {
        session_id: RecordId,
        note_id: RecordId,
        created: Vec<RecordId>,
        failures: Vec<AssessmentFailure>,
    },
}

impl SubmitError {
    /// Records that exist on the server despite the failure.
    pub fn created_ids(&self) -> Vec<RecordId> {
        match self {
            Self::Invalid(_) | Self::SessionCreate(_) => Vec::new(),
            Self::NoteCreate { session_id, .. } => vec![session_id.clone()],
            Self::Assessments {
                session_id,
                note_id,
                created,
                ..
            } => [session_id.clone(), note_id.clone()]
                .into_iter()
                .chain(created.iter().cloned())
                .collect(),
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run `call`, turning an elapsed `after` into `ApiError::Timeout`.
async fn bounded<T, F>(what: &str, after: Duration, call: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::time::timeout(after, call)
        .await
        .unwrap_or_else(|_| {
            Err(ApiError::Timeout {
                path: what.to_string(),
                after,
            })
        })
}

/// Submit `draft` through `api`.
///
/// Nothing is sent unless the draft validates. Dropping the returned
/// future abandons the remaining steps.
///
/// # Errors
///
/// See [`SubmitError`]; every variant after `Invalid` reports what was
/// already created.
pub async fn submit(
    api: &dyn PracticeApi,
    draft: &SessionDraft,
    options: &SubmitOptions,
) -> Result<SubmissionReceipt, SubmitError> {
    let span = info_span!("submit", draft_id = %draft.draft_id());
    run(api, draft, options.timeout).instrument(span).await
}

async fn run(
    api: &dyn PracticeApi,
    draft: &SessionDraft,
    timeout: Duration,
) -> Result<SubmissionReceipt, SubmitError> {
    draft.validate().map_err(SubmitError::Invalid)?;
    let session = NewSession::from_draft(draft).map_err(|issue| SubmitError::Invalid(vec![issue]))?;

    let session_id = bounded("create session", timeout, api.create_session(&session))
        .await
        .map_err(SubmitError::SessionCreate)?
        .id;
    info!(%session_id, "session created");

    let note = NewSessionNote::from_draft(draft, session_id.clone(), session.client_id);
    let note_id = match bounded("create note", timeout, api.create_note(&session_id, &note)).await
    {
        Ok(created) => created.id,
        Err(source) => {
            warn!(%session_id, error = %source, "note failed; session left in place");
            return Err(SubmitError::NoteCreate { session_id, source });
        }
    };
    info!(%note_id, "note created");

    let target = AssessmentTarget {
        session_id: session_id.clone(),
        note_id: note_id.clone(),
    };
    let payloads: Vec<NewAssessment> = draft
        .assessments()
        .iter()
        .map(|a| NewAssessment::from_assessment(a, note_id.clone()))
        .collect();

    let results = join_all(
        payloads
            .iter()
            .map(|p| bounded("create assessment", timeout, api.create_assessment(&target, p))),
    )
    .await;

    let mut created = Vec::with_capacity(payloads.len());
    let mut failures = Vec::new();
    for (payload, result) in payloads.iter().zip(results) {
        match result {
            Ok(record) => created.push(record.id),
            Err(error) => {
                warn!(goal_id = payload.goal_id, error = %error, "assessment failed");
                failures.push(AssessmentFailure {
                    goal_id: payload.goal_id,
                    error,
                });
            }
        }
    }

    if !failures.is_empty() {
        return Err(SubmitError::Assessments {
            session_id,
            note_id,
            created,
            failures,
        });
    }

    info!(
        %session_id,
        %note_id,
        assessments = created.len(),
        "submission complete"
    );
    Ok(SubmissionReceipt {
        session_id,
        note_id,
        assessment_ids: created,
    })
}
