use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{SimulationDetail, SimulationResult};

const FALLBACK_SKILL: &str = "Core Skill";
const FALLBACK_NAME: &str = "Profile";
const FALLBACK_SUMMARY: &str =
    "Demonstrated proficiency in resolving complex technical bottlenecks.";
const JUSTIFICATION_SKILL: &str = "Decision Justification";
const JUSTIFICATION_DETAIL: &str = "Communicated technical rationale clearly, bridging the gap \
     between implementation details and business value.";

/// User-profile fields shown on the report. Supplied by the caller; the
/// session never stores profile data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDisplay {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillDetail {
    pub skill: String,
    pub impact: f64,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub candidate: String,
    pub simulation_title: String,
    pub target_skill: String,
    pub before_score: f64,
    /// Clamped to 0–100 for display.
    pub after_score: f64,
    pub impact: f64,
    pub skills: Vec<SkillDetail>,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

/// Projects a scored attempt into the reflection report.
pub fn render_report(
    result: &SimulationResult,
    simulation: &SimulationDetail,
    profile: &ProfileDisplay,
) -> Report {
    let target_skill = if simulation.target_skill.trim().is_empty() {
        FALLBACK_SKILL.to_string()
    } else {
        simulation.target_skill.clone()
    };
    let summary = result
        .summary
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_SUMMARY.to_string());
    let candidate = profile
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_NAME)
        .to_string();

    let skills = vec![
        SkillDetail {
            skill: target_skill.clone(),
            impact: result.technical_impact(),
            detail: summary.clone(),
        },
        SkillDetail {
            skill: JUSTIFICATION_SKILL.to_string(),
            impact: result.communication_impact(),
            detail: JUSTIFICATION_DETAIL.to_string(),
        },
    ];

    Report {
        candidate,
        simulation_title: simulation.title.clone(),
        target_skill,
        before_score: result.before_score,
        after_score: result.after_score.clamp(0.0, 100.0),
        impact: result.impact,
        skills,
        summary,
        generated_at: Utc::now(),
    }
}

impl Report {
    /// `Pathway_Report_<Name_With_Underscores>.md`, reduced to filename-safe chars.
    pub fn file_name(&self) -> String {
        let name: String = self
            .candidate
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        let name = if name.is_empty() {
            FALLBACK_NAME.to_string()
        } else {
            name
        };
        format!("Pathway_Report_{name}.md")
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "# Readiness Report: {}", self.candidate);
        let _ = writeln!(out);
        let _ = writeln!(out, "**Simulation:** {}  ", self.simulation_title);
        let _ = writeln!(out, "**Target skill:** {}  ", self.target_skill);
        let _ = writeln!(
            out,
            "**Generated:** {}",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "## Readiness");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Before | After | Change |");
        let _ = writeln!(out, "|---|---|---|");
        let _ = writeln!(
            out,
            "| {:.0}% | {:.0}% | +{:.1}% |",
            self.before_score, self.after_score, self.impact
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "## Skill impact");
        let _ = writeln!(out);
        for skill in &self.skills {
            let _ = writeln!(
                out,
                "- **{}** (+{:.0}%): {}",
                skill.skill,
                skill.impact.max(0.0),
                skill.detail
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "## Summary");
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.summary);
        out
    }
}
