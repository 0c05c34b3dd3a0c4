use serde::Serialize;

use crate::catalog::{Attempt, Recommendation, SimulationDetail, SimulationResult};
use crate::session::decisions::DecisionSet;
use crate::session::timer::Countdown;

/// The task workspace: always holds an attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskState {
    pub attempt: Attempt,
    pub decisions: DecisionSet,
    pub countdown: Countdown,
}

impl TaskState {
    pub fn new(attempt: Attempt) -> Self {
        Self {
            attempt,
            decisions: DecisionSet::default(),
            countdown: Countdown::default(),
        }
    }

    /// `(selected, available)` for the progress badge.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.decisions.selected_count(),
            self.attempt.simulation.actions.len(),
        )
    }
}

/// Terminal display state: always holds a result. Keeps the simulation so
/// the report can be rendered without another fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReflectionState {
    pub result: SimulationResult,
    pub simulation: SimulationDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Dashboard,
    Briefing(SimulationDetail),
    Task(TaskState),
    Reflection(ReflectionState),
}

impl SessionState {
    pub fn step(&self) -> Step {
        match self {
            SessionState::Dashboard => Step::Dashboard,
            SessionState::Briefing(_) => Step::Briefing,
            SessionState::Task(_) => Step::Task,
            SessionState::Reflection(_) => Step::Reflection,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Dashboard,
    Briefing,
    Task,
    Reflection,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Step::Dashboard => "dashboard",
            Step::Briefing => "briefing",
            Step::Task => "task",
            Step::Reflection => "reflection",
        })
    }
}

/// Network-backed transitions. At most one is in flight per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    View,
    Start,
    Commit,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Transition::View => "view",
            Transition::Start => "start",
            Transition::Commit => "commit",
        })
    }
}

/// Point-in-time copy of the session for callers and the host API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub in_flight: Option<Transition>,
    pub recommendation: Option<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_serializes_as_bare_tag() {
        let value = serde_json::to_value(SessionState::Dashboard).unwrap();
        assert_eq!(value, serde_json::json!({"step": "dashboard"}));
    }

    #[test]
    fn test_step_display_matches_serialized_tag() {
        for step in [Step::Dashboard, Step::Briefing, Step::Task, Step::Reflection] {
            assert_eq!(serde_json::to_value(step).unwrap(), step.to_string());
        }
    }
}
