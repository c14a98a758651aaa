use tracing::warn;

use crate::advise::AdviseResult;
use crate::catalog::CourseStats;
use crate::client::{BackendClient, ClientError};
use crate::metrics::MetricsReport;
use crate::profile::UserProfile;

/// Result slots for one advise interaction: the primary result, the
/// retrieval-mode comparison, and the dashboard metrics. Each slot is
/// written at most once per interaction; `reset` clears all three.
#[derive(Debug, Default)]
pub struct AdviceSession {
    pub primary: Option<AdviseResult>,
    pub comparison: Option<Vec<AdviseResult>>,
    pub metrics: Option<MetricsReport>,
}

impl AdviceSession {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Runs the advise interaction: the primary and comparison fetches are
/// issued together and both awaited; a primary-flow failure aborts with no
/// partial results. The follow-up metrics fetch is secondary: its failure is
/// logged and swallowed so the recommendations still display.
pub async fn run_advice(
    client: &BackendClient,
    profile: &UserProfile,
) -> Result<AdviceSession, ClientError> {
    let mut session = AdviceSession::default();

    let (primary, comparison) =
        tokio::try_join!(client.advise(profile), client.advise_compare(profile))?;
    session.primary = Some(primary);
    session.comparison = Some(comparison);

    match client.metrics_report().await {
        Ok(report) => session.metrics = Some(report),
        Err(err) => warn!("metrics fetch failed, showing results without dashboard data: {err}"),
    }

    Ok(session)
}

/// One dashboard refresh: the metrics report and the catalog stats are
/// fetched together and both must succeed.
pub async fn fetch_dashboard(
    client: &BackendClient,
) -> Result<(MetricsReport, CourseStats), ClientError> {
    tokio::try_join!(client.metrics_report(), client.course_stats())
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use super::{fetch_dashboard, AdviceSession};
    use crate::advise::AdviseResult;
    use crate::client::BackendClient;
    use crate::config::BackendConfig;

    #[test]
    fn reset_clears_every_slot() {
        let mut session = AdviceSession {
            primary: Some(AdviseResult::default()),
            comparison: Some(vec![AdviseResult::default()]),
            metrics: None,
        };
        session.reset();
        assert!(session.primary.is_none());
        assert!(session.comparison.is_none());
        assert!(session.metrics.is_none());
    }

    #[tokio::test]
    async fn dashboard_refresh_fetches_metrics_and_stats_together() {
        let app = Router::new()
            .route(
                "/api/v1/metrics/reports",
                get(|| async {
                    Json(json!({
                        "request_id": "r-1",
                        "status": "ok",
                        "data": {
                            "latency": [{
                                "timestamp": "2026-08-01T09:00:00Z",
                                "component": "advisor",
                                "operation": "advise",
                                "duration_ms": 1200.0,
                                "success": true
                            }]
                        }
                    }))
                }),
            )
            .route(
                "/api/v1/courses/stats",
                get(|| async {
                    Json(json!({
                        "request_id": "r-2",
                        "status": "ok",
                        "data": {"total_courses": 3, "providers": {"edX": 3}}
                    }))
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("missing local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        let client = BackendClient::new(&BackendConfig {
            url: format!("http://{addr}"),
            ..Default::default()
        });
        let (report, stats) = fetch_dashboard(&client)
            .await
            .expect("dashboard fetch failed");
        assert_eq!(report.latency.len(), 1);
        assert!((report.latency[0].duration_ms - 1200.0).abs() < 1e-9);
        assert_eq!(stats.total_courses, 3);
        assert_eq!(stats.providers["edX"], 3);
    }
}
