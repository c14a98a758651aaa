pub mod aggregate;
pub mod ingest;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One accuracy sample from the backend's metrics reports. Entries arrive
/// chronological, oldest first; the client assumes but does not verify that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracyEntry {
    pub timestamp: DateTime<Utc>,
    pub component: String,
    pub operation: String,
    pub accuracy_score: f64,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub correct_items: u64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatencyEntry {
    pub timestamp: DateTime<Utc>,
    pub component: String,
    pub operation: String,
    pub duration_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostEntry {
    pub timestamp: DateTime<Utc>,
    pub component: String,
    pub operation: String,
    pub cost_usd: f64,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

/// The raw time-series payload behind the operational dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricsReport {
    #[serde(default)]
    pub accuracy: Vec<AccuracyEntry>,
    #[serde(default)]
    pub latency: Vec<LatencyEntry>,
    #[serde(default)]
    pub cost: Vec<CostEntry>,
}

impl MetricsReport {
    pub fn is_empty(&self) -> bool {
        self.accuracy.is_empty() && self.latency.is_empty() && self.cost.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::MetricsReport;

    #[test]
    fn parses_report_with_sparse_entries() {
        let report: MetricsReport = serde_json::from_value(json!({
            "accuracy": [{
                "timestamp": "2026-08-01T09:30:00Z",
                "component": "retriever",
                "operation": "advise",
                "accuracy_score": 0.82
            }],
            "latency": [],
            "cost": [{
                "timestamp": "2026-08-01T09:30:01Z",
                "component": "llm",
                "operation": "advise",
                "cost_usd": 0.0042,
                "model_name": "gpt-4o-mini"
            }]
        }))
        .expect("failed to parse metrics report");
        assert_eq!(report.accuracy.len(), 1);
        assert_eq!(report.accuracy[0].total_items, 0);
        assert_eq!(report.cost[0].tokens_used, None);
        assert!(!report.is_empty());
    }

    #[test]
    fn missing_series_default_to_empty() {
        let report: MetricsReport = serde_json::from_value(json!({})).expect("parse");
        assert!(report.is_empty());
    }
}
