//! Scripted `SimulationApi` and fixtures shared by session and host tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::catalog::models::{
    ImpactEntry, ImpactKind, Scenario, SimulationAction, SkillScore,
};
use crate::catalog::{
    ApiError, Attempt, Recommendation, SimulationApi, SimulationDetail, SimulationResult,
    SimulationSummary, Submission,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Recommendation,
    Simulation(String),
    Start(String),
    Submit(String, Submission),
}

type Queue<T> = Mutex<VecDeque<Result<T, ApiError>>>;

/// Replays queued responses in order. An empty queue answers with a 500.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    recommendations: Queue<Recommendation>,
    details: Queue<SimulationDetail>,
    starts: Queue<Attempt>,
    submits: Queue<SimulationResult>,
    calls: Mutex<Vec<Call>>,
    start_gate: Mutex<Option<Arc<Notify>>>,
    submit_gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedApi {
    pub(crate) fn push_recommendation(&self, r: Result<Recommendation, ApiError>) {
        self.recommendations.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_detail(&self, r: Result<SimulationDetail, ApiError>) {
        self.details.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_start(&self, r: Result<Attempt, ApiError>) {
        self.starts.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_submit(&self, r: Result<SimulationResult, ApiError>) {
        self.submits.lock().unwrap().push_back(r);
    }

    /// Holds every start call until the returned `Notify` is signalled.
    pub(crate) fn gate_starts(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.start_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Holds every submit call until the returned `Notify` is signalled.
    pub(crate) fn gate_submits(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.submit_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(queue: &Queue<T>) -> Result<T, ApiError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(api_error(500, "no scripted response")))
    }
}

async fn wait_on(gate: &Mutex<Option<Arc<Notify>>>) {
    let gate = gate.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

#[async_trait]
impl SimulationApi for ScriptedApi {
    async fn recommendation(&self) -> Result<Recommendation, ApiError> {
        self.record(Call::Recommendation);
        Self::next(&self.recommendations)
    }

    async fn simulation(&self, simulation_id: &str) -> Result<SimulationDetail, ApiError> {
        self.record(Call::Simulation(simulation_id.to_string()));
        Self::next(&self.details)
    }

    async fn start_attempt(&self, simulation_id: &str) -> Result<Attempt, ApiError> {
        self.record(Call::Start(simulation_id.to_string()));
        wait_on(&self.start_gate).await;
        Self::next(&self.starts)
    }

    async fn submit_attempt(
        &self,
        attempt_id: &str,
        submission: &Submission,
    ) -> Result<SimulationResult, ApiError> {
        self.record(Call::Submit(attempt_id.to_string(), submission.clone()));
        wait_on(&self.submit_gate).await;
        Self::next(&self.submits)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixtures
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn api_error(status: u16, message: &str) -> ApiError {
    ApiError::Api {
        status,
        message: message.to_string(),
    }
}

fn action(id: &str, label: &str, risk: &str) -> SimulationAction {
    SimulationAction {
        id: id.to_string(),
        label: label.to_string(),
        description: format!("{label} on the reporting database"),
        risk: risk.to_string(),
        time: None,
        complexity: None,
        impact: None,
        risk_label: None,
        cost_label: None,
        complexity_label: None,
        extra_label: None,
    }
}

pub(crate) fn detail(id: &str) -> SimulationDetail {
    SimulationDetail {
        id: id.to_string(),
        title: "SQL Performance Audit: Optimizing the Customer Dashboard".to_string(),
        target_skill: "SQL Query Optimization".to_string(),
        max_impact: 15.0,
        scenario: Scenario {
            context: "The Top Customers report takes over 30 seconds to load.".to_string(),
            problem_brief: "The attached query drives the report.".to_string(),
            key_areas: vec!["Indexing strategies".to_string()],
        },
        actions: vec![
            action("fix-index", "Fix Index", "High"),
            action("add-cache", "Add Cache", "Medium"),
            action("inspect-plan", "Inspect Query Plan", "Low"),
        ],
        role: Some("Data Analyst".to_string()),
        estimated_time: Some("20-45 min".to_string()),
        artifact: None,
    }
}

pub(crate) fn attempt(attempt_id: &str, simulation_id: &str) -> Attempt {
    Attempt {
        attempt_id: attempt_id.to_string(),
        simulation: detail(simulation_id),
        started_at: chrono::Utc::now(),
    }
}

pub(crate) fn scored_result() -> SimulationResult {
    SimulationResult {
        before_score: 72.5,
        after_score: 80.5,
        impact: 8.0,
        breakdown: vec![
            ImpactEntry {
                kind: ImpactKind::Technical,
                impact: 5.0,
                action: Some("Add Cache".to_string()),
                note: None,
            },
            ImpactEntry {
                kind: ImpactKind::Communication,
                impact: 3.0,
                action: Some("Technical Justification".to_string()),
                note: None,
            },
        ],
        summary: Some("Demonstrated good proficiency in SQL Query Optimization.".to_string()),
        skill_impact: HashMap::new(),
    }
}

pub(crate) fn recommendation(readiness: f64) -> Recommendation {
    Recommendation {
        recommended_simulation: SimulationSummary {
            id: "sql-perf-audit".to_string(),
            name: "SQL Performance Audit".to_string(),
            skill_addressed: "SQL Query Optimization".to_string(),
            impact_explanation: "Closes your SQL reasoning gap.".to_string(),
            est_time: "20-45 min".to_string(),
        },
        readiness_score: readiness,
        readiness_label: Some("Good".to_string()),
        target_role: "Data Analyst".to_string(),
        skill_breakdown: vec![SkillScore {
            name: "SQL Query Optimization".to_string(),
            score: 80.0,
            status: Some("Proficient".to_string()),
        }],
        all_available: Vec::new(),
    }
}
