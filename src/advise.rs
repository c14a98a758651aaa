use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::course::Course;

/// One advise response from the backend: a learning plan, the skill-gap map,
/// the recommended course list, and optional run metrics / timeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdviseResult {
    #[serde(default)]
    pub plan: Vec<PlanStep>,
    #[serde(default)]
    pub gap_map: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub recommended_courses: Vec<Course>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub metrics: Option<RunMetrics>,
    #[serde(default)]
    pub timeline: Option<Timeline>,
}

impl AdviseResult {
    /// Course lookup by id, used to join plan steps to course details.
    pub fn course_by_id(&self, course_id: &str) -> Option<&Course> {
        self.recommended_courses
            .iter()
            .find(|c| c.course_id == course_id)
    }

    pub fn retrieval_mode(&self) -> &str {
        self.metrics
            .as_ref()
            .and_then(|m| m.retrieval_mode.as_deref())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlanStep {
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub why: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub estimated_weeks: Option<f64>,
}

/// Per-run metrics the backend attaches to an advise result. All optional;
/// unrecognized keys are preserved for JSON passthrough.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunMetrics {
    #[serde(default)]
    pub retrieval_mode: Option<String>,
    #[serde(default)]
    pub coverage: Option<f64>,
    #[serde(default)]
    pub diversity: Option<f64>,
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub selected_count: Option<u64>,
    #[serde(default)]
    pub covered_target_skills: Option<u64>,
    #[serde(default)]
    pub skill_map: Option<SkillMapSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkillMapSummary {
    #[serde(default)]
    pub covered_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub coverage_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Timeline {
    #[serde(default)]
    pub total_weeks: f64,
    #[serde(default)]
    pub phases: Vec<TimelinePhase>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimelinePhase {
    pub phase: String,
    #[serde(default)]
    pub weeks: String,
    #[serde(default)]
    pub focus: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::AdviseResult;

    #[test]
    fn parses_minimal_advise_payload() {
        let result: AdviseResult = serde_json::from_value(json!({
            "plan": [{"course_id": "c-1", "action": "take", "why": "closes the SQL gap"}],
            "gap_map": {"sql": ["joins", "window functions"]},
            "recommended_courses": [{"course_id": "c-1", "title": "SQL Deep Dive"}]
        }))
        .expect("failed to parse advise result");
        assert_eq!(result.plan.len(), 1);
        assert_eq!(
            result.course_by_id("c-1").map(|c| c.title.as_str()),
            Some("SQL Deep Dive")
        );
        assert!(result.course_by_id("missing").is_none());
        assert_eq!(result.retrieval_mode(), "unknown");
    }

    #[test]
    fn run_metrics_keeps_unrecognized_keys() {
        let result: AdviseResult = serde_json::from_value(json!({
            "metrics": {
                "retrieval_mode": "hybrid",
                "coverage": 0.8,
                "rerank_depth": 40
            }
        }))
        .expect("failed to parse advise result");
        let metrics = result.metrics.as_ref().expect("metrics missing");
        assert_eq!(result.retrieval_mode(), "hybrid");
        assert_eq!(metrics.extra["rerank_depth"], 40);
    }
}
