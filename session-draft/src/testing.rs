//! In-memory practice API for tests. Compiled only under `cfg(test)`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::{
    ApiError, AssessmentTarget, CreatedRecord, NewAssessment, NewSession, NewSessionNote,
    PracticeApi, RecordId,
};
use crate::models::{
    Ally, BudgetItem, BudgetSettings, Client, Goal, SessionRecord, SessionStatus, Strategy,
    Subgoal,
};

/// Recording fake of the practice API.
///
/// Every call appends `"start <name>"` and `"done <name>"` to the log, so
/// tests can assert on ordering. Create calls also keep their JSON body.
/// Assessment calls are named `create_assessment:<goal id>`.
#[derive(Default)]
pub struct FixtureApi {
    clients: Vec<Client>,
    allies: HashMap<i64, Vec<Ally>>,
    goals: HashMap<i64, Vec<Goal>>,
    subgoals: HashMap<i64, Vec<Subgoal>>,
    budget_settings: HashMap<i64, BudgetSettings>,
    budget_items: HashMap<i64, Vec<BudgetItem>>,
    strategies: Vec<Strategy>,
    sessions: Vec<SessionRecord>,

    log: Mutex<Vec<String>>,
    bodies: Mutex<Vec<(String, serde_json::Value)>>,
    fail_reads: AtomicBool,
    failing: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<String, Duration>>,
    assessments_created: AtomicUsize,
}

fn goal(id: i64, title: &str) -> Goal {
    Goal {
        id,
        title: title.to_string(),
        description: String::new(),
    }
}

fn subgoal(id: i64, goal_id: i64, title: &str) -> Subgoal {
    Subgoal {
        id,
        goal_id,
        title: title.to_string(),
        description: String::new(),
    }
}

fn ally(id: i64, name: &str, relationship: &str, archived: bool) -> Ally {
    Ally {
        id,
        name: name.to_string(),
        relationship: relationship.to_string(),
        archived,
    }
}

fn budget_item(id: i64, settings_id: i64, code: &str, quantity: f64, unit_price: f64) -> BudgetItem {
    BudgetItem {
        id,
        budget_settings_id: settings_id,
        client_id: 1,
        item_code: code.to_string(),
        description: format!("{code} description"),
        quantity,
        unit_price,
    }
}

fn strategy(id: i64, name: &str) -> Strategy {
    Strategy {
        id,
        name: name.to_string(),
        category: "speech".to_string(),
        description: String::new(),
    }
}

impl FixtureApi {
    /// Two clients; client 1 has allies, two goals with milestones, an
    /// active budget plan (id 10) and a handful of budget items.
    pub fn sample() -> Self {
        Self {
            clients: vec![
                Client {
                    id: 1,
                    name: "Ava Thompson".to_string(),
                },
                Client {
                    id: 2,
                    name: "Liam Chen".to_string(),
                },
            ],
            allies: HashMap::from([(
                1,
                vec![
                    ally(3, "Dana Thompson", "mother", false),
                    ally(4, "Sam Ortiz", "support worker", false),
                    ally(5, "Old Carer", "carer", true),
                ],
            )]),
            goals: HashMap::from([(
                1,
                vec![
                    goal(24, "Improve articulation"),
                    goal(25, "Expand vocabulary"),
                ],
            )]),
            subgoals: HashMap::from([
                (
                    24,
                    vec![
                        subgoal(101, 24, "Produce /s/ in isolation"),
                        subgoal(102, 24, "Produce /s/ in words"),
                    ],
                ),
                (25, vec![subgoal(103, 25, "Name 20 common objects")]),
            ]),
            budget_settings: HashMap::from([
                (
                    1,
                    BudgetSettings {
                        id: 10,
                        is_active: true,
                        client_id: 1,
                    },
                ),
                (
                    2,
                    BudgetSettings {
                        id: 20,
                        is_active: false,
                        client_id: 2,
                    },
                ),
            ]),
            budget_items: HashMap::from([(
                1,
                vec![
                    budget_item(9001, 10, "THERAPY-001", 10.0, 150.0),
                    budget_item(9002, 10, "KIT-002", 2.0, 35.5),
                    budget_item(9003, 9, "OLD-003", 4.0, 20.0),
                    budget_item(9004, 10, "EMPTY-004", 0.0, 80.0),
                ],
            )]),
            strategies: vec![
                strategy(1, "Modeling"),
                strategy(2, "Prompting"),
                strategy(3, "Visual cues"),
                strategy(4, "Chaining"),
                strategy(5, "Shaping"),
                strategy(6, "Fading"),
            ],
            sessions: vec![SessionRecord {
                id: RecordId::Int(500),
                client_id: 1,
                title: "Initial assessment".to_string(),
                session_date: None,
                duration: 60,
                status: SessionStatus::Completed,
            }],
            ..Self::default()
        }
    }

    /// Make every read endpoint fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make the named endpoint fail with HTTP 500.
    pub fn fail_on(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    /// Delay the named endpoint before it responds.
    pub fn delay(&self, name: &str, by: Duration) {
        self.delays.lock().unwrap().insert(name.to_string(), by);
    }

    /// Ordered `"start <name>"` / `"done <name>"` entries.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        let start = format!("start {name}");
        self.log.lock().unwrap().iter().filter(|e| **e == start).count()
    }

    /// JSON bodies of create calls, in the order they arrived.
    pub fn bodies(&self, name: &str) -> Vec<serde_json::Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, b)| b.clone())
            .collect()
    }

    async fn enter(&self, name: &str) -> Result<(), ApiError> {
        self.log.lock().unwrap().push(format!("start {name}"));
        let delay = self.delays.lock().unwrap().get(name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let fail = self.failing.lock().unwrap().contains(name);
        self.log.lock().unwrap().push(format!("done {name}"));
        if fail {
            return Err(ApiError::Status {
                path: name.to_string(),
                status: 500,
            });
        }
        Ok(())
    }

    async fn read<T: Clone + Default>(&self, name: &str, value: Option<&T>) -> Result<T, ApiError> {
        self.enter(name).await?;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                path: name.to_string(),
                status: 503,
            });
        }
        Ok(value.cloned().unwrap_or_default())
    }

    async fn create<B: Serialize>(
        &self,
        name: &str,
        body: &B,
        id: RecordId,
    ) -> Result<CreatedRecord, ApiError> {
        let json = serde_json::to_value(body).unwrap();
        self.bodies.lock().unwrap().push((name.to_string(), json));
        self.enter(name).await?;
        Ok(CreatedRecord { id })
    }
}

#[async_trait]
impl PracticeApi for FixtureApi {
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        self.read("list_clients", Some(&self.clients)).await
    }

    async fn list_allies(&self, client_id: i64) -> Result<Vec<Ally>, ApiError> {
        self.read("list_allies", self.allies.get(&client_id)).await
    }

    async fn list_goals(&self, client_id: i64) -> Result<Vec<Goal>, ApiError> {
        self.read("list_goals", self.goals.get(&client_id)).await
    }

    async fn list_subgoals(&self, goal_id: i64) -> Result<Vec<Subgoal>, ApiError> {
        self.read("list_subgoals", self.subgoals.get(&goal_id)).await
    }

    async fn budget_settings(&self, client_id: i64) -> Result<Option<BudgetSettings>, ApiError> {
        let settings = self.budget_settings.get(&client_id).cloned();
        self.read("budget_settings", Some(&settings)).await
    }

    async fn list_budget_items(&self, client_id: i64) -> Result<Vec<BudgetItem>, ApiError> {
        self.read("list_budget_items", self.budget_items.get(&client_id))
            .await
    }

    async fn list_strategies(&self) -> Result<Vec<Strategy>, ApiError> {
        self.read("list_strategies", Some(&self.strategies)).await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, ApiError> {
        self.read("list_sessions", Some(&self.sessions)).await
    }

    async fn create_session(&self, session: &NewSession) -> Result<CreatedRecord, ApiError> {
        self.create("create_session", session, "S1".into()).await
    }

    async fn create_note(
        &self,
        _session_id: &RecordId,
        note: &NewSessionNote,
    ) -> Result<CreatedRecord, ApiError> {
        self.create("create_note", note, "N1".into()).await
    }

    async fn create_assessment(
        &self,
        _target: &AssessmentTarget,
        assessment: &NewAssessment,
    ) -> Result<CreatedRecord, ApiError> {
        let n = self.assessments_created.fetch_add(1, Ordering::SeqCst) + 1;
        let name = format!("create_assessment:{}", assessment.goal_id);
        self.create(&name, assessment, RecordId::Text(format!("A{n}")))
            .await
    }
}
