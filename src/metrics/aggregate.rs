use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics::MetricsReport;

/// Window size for the rolling trend comparison: mean of the last 10 entries
/// against the mean of the 10 before that.
pub const TREND_WINDOW: usize = 10;

/// Response-time target the dashboard grades against (2.5 s).
pub const PERFORMANCE_TARGET_MS: f64 = 2500.0;

/// Dashboard rollups, recomputed whole from the full report on every call.
/// Every division guards its denominator, so no field is ever NaN.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregateKpis {
    pub total_cost: f64,
    pub success_rate: f64,
    pub avg_response_time: f64,
    pub avg_accuracy: f64,
    pub cost_per_request: f64,
    pub accuracy_trend_pct: f64,
    pub latency_trend_pct: f64,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub performance_target_met: bool,
}

pub fn aggregate_kpis(report: &MetricsReport) -> AggregateKpis {
    let total_cost: f64 = report.cost.iter().map(|e| e.cost_usd).sum();

    let total_requests = report.latency.len();
    let successful_requests = report.latency.iter().filter(|e| e.success).count();
    let success_rate = if total_requests > 0 {
        100.0 * successful_requests as f64 / total_requests as f64
    } else {
        0.0
    };

    let durations: Vec<f64> = report.latency.iter().map(|e| e.duration_ms).collect();
    let accuracies: Vec<f64> = report.accuracy.iter().map(|e| e.accuracy_score).collect();

    let avg_response_time = mean(&durations);
    let avg_accuracy = mean(&accuracies);
    let cost_per_request = if total_requests > 0 {
        total_cost / total_requests as f64
    } else {
        0.0
    };

    AggregateKpis {
        total_cost,
        success_rate,
        avg_response_time,
        avg_accuracy,
        cost_per_request,
        accuracy_trend_pct: trend_percent(&accuracies),
        latency_trend_pct: trend_percent(&durations),
        total_requests,
        successful_requests,
        performance_target_met: avg_response_time <= PERFORMANCE_TARGET_MS,
    }
}

/// Mean accuracy per component. Grouping is case-sensitive and exact.
pub fn accuracy_by_component(report: &MetricsReport) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for entry in &report.accuracy {
        let slot = sums.entry(entry.component.clone()).or_insert((0.0, 0));
        slot.0 += entry.accuracy_score;
        slot.1 += 1;
    }
    sums.into_iter()
        .map(|(component, (total, count))| (component, total / count as f64))
        .collect()
}

/// Total spend per model for the cost breakdown chart. Entries without a
/// model name land under "unknown".
pub fn cost_by_model(report: &MetricsReport) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for entry in &report.cost {
        let model = entry
            .model_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        *totals.entry(model).or_insert(0.0) += entry.cost_usd;
    }
    totals
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentage change between the recent window mean and the previous window
/// mean. Returns 0 when the previous window is empty or averages 0, so the
/// caller never sees Infinity or NaN.
fn trend_percent(values: &[f64]) -> f64 {
    let len = values.len();
    let recent = &values[len.saturating_sub(TREND_WINDOW)..];
    let previous =
        &values[len.saturating_sub(2 * TREND_WINDOW)..len.saturating_sub(TREND_WINDOW)];
    let recent_mean = mean(recent);
    let previous_mean = mean(previous);
    if previous_mean > 0.0 {
        100.0 * (recent_mean - previous_mean) / previous_mean
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::Map;

    use super::{accuracy_by_component, aggregate_kpis, cost_by_model, trend_percent};
    use crate::metrics::{AccuracyEntry, CostEntry, LatencyEntry, MetricsReport};

    fn latency(idx: i64, duration_ms: f64, success: bool) -> LatencyEntry {
        LatencyEntry {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap() + Duration::seconds(idx),
            component: "advisor".to_string(),
            operation: "advise".to_string(),
            duration_ms,
            success,
            metadata: Map::new(),
        }
    }

    fn accuracy(idx: i64, component: &str, score: f64) -> AccuracyEntry {
        AccuracyEntry {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap() + Duration::seconds(idx),
            component: component.to_string(),
            operation: "advise".to_string(),
            accuracy_score: score,
            total_items: 10,
            correct_items: (score * 10.0) as u64,
            metadata: Map::new(),
        }
    }

    fn cost(idx: i64, model: Option<&str>, cost_usd: f64) -> CostEntry {
        CostEntry {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap() + Duration::seconds(idx),
            component: "llm".to_string(),
            operation: "advise".to_string(),
            cost_usd,
            tokens_used: None,
            model_name: model.map(str::to_string),
            metadata: Map::new(),
        }
    }

    #[test]
    fn empty_report_yields_zeroes_not_nan() {
        let kpis = aggregate_kpis(&MetricsReport::default());
        assert_eq!(kpis.success_rate, 0.0);
        assert_eq!(kpis.avg_response_time, 0.0);
        assert_eq!(kpis.avg_accuracy, 0.0);
        assert_eq!(kpis.cost_per_request, 0.0);
        assert_eq!(kpis.accuracy_trend_pct, 0.0);
        assert!(kpis.success_rate.is_finite());
    }

    #[test]
    fn basic_rollups() {
        let report = MetricsReport {
            accuracy: vec![accuracy(0, "retriever", 0.8), accuracy(1, "planner", 0.6)],
            latency: vec![
                latency(0, 1000.0, true),
                latency(1, 3000.0, false),
                latency(2, 2000.0, true),
            ],
            cost: vec![cost(0, Some("gpt-4o"), 0.03), cost(1, None, 0.01)],
        };
        let kpis = aggregate_kpis(&report);
        assert!((kpis.total_cost - 0.04).abs() < 1e-9);
        assert!((kpis.success_rate - 200.0 / 3.0).abs() < 1e-9);
        assert!((kpis.avg_response_time - 2000.0).abs() < 1e-9);
        assert!((kpis.avg_accuracy - 0.7).abs() < 1e-9);
        assert!((kpis.cost_per_request - 0.04 / 3.0).abs() < 1e-9);
        assert_eq!(kpis.total_requests, 3);
        assert_eq!(kpis.successful_requests, 2);
        assert!(kpis.performance_target_met);
    }

    #[test]
    fn trend_with_zero_previous_window_is_zero() {
        // Fewer than 10 prior entries: previous window empty.
        assert_eq!(trend_percent(&[1.0, 2.0, 3.0]), 0.0);
        // Previous window present but all zero.
        let mut values = vec![0.0; 10];
        values.extend(vec![5.0; 10]);
        assert_eq!(trend_percent(&values), 0.0);
    }

    #[test]
    fn trend_compares_last_ten_against_previous_ten() {
        let mut values = vec![100.0; 10];
        values.extend(vec![150.0; 10]);
        assert!((trend_percent(&values) - 50.0).abs() < 1e-9);

        // Entries older than both windows must not affect the result.
        let mut padded = vec![9000.0; 5];
        padded.extend(values);
        assert!((trend_percent(&padded) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn component_grouping_is_case_sensitive() {
        let report = MetricsReport {
            accuracy: vec![
                accuracy(0, "Retriever", 1.0),
                accuracy(1, "retriever", 0.5),
                accuracy(2, "retriever", 0.7),
            ],
            ..Default::default()
        };
        let grouped = accuracy_by_component(&report);
        assert_eq!(grouped.len(), 2);
        assert!((grouped["Retriever"] - 1.0).abs() < 1e-9);
        assert!((grouped["retriever"] - 0.6).abs() < 1e-9);
    }

    #[test]
    fn cost_groups_missing_model_under_unknown() {
        let report = MetricsReport {
            cost: vec![
                cost(0, Some("gpt-4o"), 0.02),
                cost(1, Some("gpt-4o"), 0.03),
                cost(2, None, 0.01),
            ],
            ..Default::default()
        };
        let grouped = cost_by_model(&report);
        assert!((grouped["gpt-4o"] - 0.05).abs() < 1e-9);
        assert!((grouped["unknown"] - 0.01).abs() < 1e-9);
    }
}
