use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Recommendation (dashboard)
// ────────────────────────────────────────────────────────────────────────────

/// Catalog snapshot of a simulation as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub id: String,
    pub name: String,
    pub skill_addressed: String,
    pub impact_explanation: String,
    pub est_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSimulation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub skill: Option<String>,
}

/// GET /api/simulations/recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended_simulation: SimulationSummary,
    /// Opaque percentage computed by the backend.
    pub readiness_score: f64,
    #[serde(default)]
    pub readiness_label: Option<String>,
    pub target_role: String,
    #[serde(default)]
    pub skill_breakdown: Vec<SkillScore>,
    #[serde(default)]
    pub all_available: Vec<AvailableSimulation>,
}

// ────────────────────────────────────────────────────────────────────────────
// Simulation detail (briefing + task)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub context: String,
    pub problem_brief: String,
    #[serde(default)]
    pub key_areas: Vec<String>,
}

/// One selectable action in a simulation's workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationAction {
    pub id: String,
    pub label: String,
    pub description: String,
    pub risk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_label: Option<String>,
}

/// Code panel shown next to the scenario brief (e.g. `query.sql`, `iam_policy.json`).
/// Supplied by the backend per simulation; the client never special-cases ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub language: String,
    pub label: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

/// GET /api/simulations/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationDetail {
    pub id: String,
    pub title: String,
    pub target_skill: String,
    pub max_impact: f64,
    pub scenario: Scenario,
    pub actions: Vec<SimulationAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactDescriptor>,
}

/// POST /api/simulations/{id}/start
///
/// The server-issued handle for one run. `started_at` is stamped on receipt
/// when the backend does not send it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub attempt_id: String,
    pub simulation: SimulationDetail,
    #[serde(default = "Utc::now")]
    pub started_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Submission + scored result (reflection)
// ────────────────────────────────────────────────────────────────────────────

/// Body of POST /api/simulations/{attemptId}/submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub decisions: Vec<String>,
    pub justification: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactKind {
    Technical,
    Communication,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactEntry {
    #[serde(rename = "type")]
    pub kind: ImpactKind,
    pub impact: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Scored outcome of a submitted attempt. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub before_score: f64,
    pub after_score: f64,
    pub impact: f64,
    #[serde(default)]
    pub breakdown: Vec<ImpactEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub skill_impact: HashMap<String, f64>,
}

impl SimulationResult {
    /// Sum of every technical breakdown entry.
    pub fn technical_impact(&self) -> f64 {
        self.breakdown
            .iter()
            .filter(|e| e.kind == ImpactKind::Technical)
            .map(|e| e.impact)
            .sum()
    }

    /// The first communication entry, if the justification earned one.
    pub fn communication_impact(&self) -> f64 {
        self.breakdown
            .iter()
            .find(|e| e.kind == ImpactKind::Communication)
            .map(|e| e.impact)
            .unwrap_or(0.0)
    }
}
