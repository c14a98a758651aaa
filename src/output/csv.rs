use anyhow::{Context, Result};

use crate::course::ScoredCourse;
use crate::metrics::aggregate::AggregateKpis;

pub fn courses_to_csv(courses: &[ScoredCourse]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "course_id",
        "title",
        "provider",
        "difficulty",
        "duration_weeks",
        "rating",
        "skill_match_pct",
        "recommendation_score",
        "popularity_score",
        "difficulty_match",
    ])?;
    for c in courses {
        writer.write_record([
            c.course.course_id.clone(),
            c.course.title.clone(),
            c.course.provider.clone().unwrap_or_default(),
            c.course.difficulty.clone().unwrap_or_default(),
            c.course
                .duration_weeks
                .map(|w| w.to_string())
                .unwrap_or_default(),
            c.course.rating().map(|r| r.to_string()).unwrap_or_default(),
            format!("{:.1}", c.skill_match_percentage),
            format!("{:.1}", c.recommendation_score),
            format!("{:.1}", c.popularity_score),
            c.difficulty_match.to_string(),
        ])?;
    }
    let bytes = writer.into_inner().context("flushing csv writer")?;
    String::from_utf8(bytes).context("csv output was not valid utf-8")
}

pub fn kpis_to_csv(kpis: &AggregateKpis) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["metric", "value"])?;
    writer.write_record(["total_cost", &format!("{:.6}", kpis.total_cost)])?;
    writer.write_record(["success_rate", &format!("{:.2}", kpis.success_rate)])?;
    writer.write_record([
        "avg_response_time_ms",
        &format!("{:.2}", kpis.avg_response_time),
    ])?;
    writer.write_record(["avg_accuracy", &format!("{:.4}", kpis.avg_accuracy)])?;
    writer.write_record(["cost_per_request", &format!("{:.6}", kpis.cost_per_request)])?;
    writer.write_record([
        "accuracy_trend_pct",
        &format!("{:.2}", kpis.accuracy_trend_pct),
    ])?;
    writer.write_record([
        "latency_trend_pct",
        &format!("{:.2}", kpis.latency_trend_pct),
    ])?;
    writer.write_record(["total_requests", &kpis.total_requests.to_string()])?;
    writer.write_record([
        "successful_requests",
        &kpis.successful_requests.to_string(),
    ])?;
    let bytes = writer.into_inner().context("flushing csv writer")?;
    String::from_utf8(bytes).context("csv output was not valid utf-8")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{courses_to_csv, kpis_to_csv};
    use crate::course::scoring::score_courses;
    use crate::course::Course;
    use crate::metrics::aggregate::aggregate_kpis;
    use crate::metrics::MetricsReport;

    #[test]
    fn course_rows_keep_header_and_values() {
        let courses: Vec<Course> = vec![serde_json::from_value(json!({
            "course_id": "c-9",
            "title": "Async Rust",
            "provider": "edX",
            "skills": ["async"]
        }))
        .expect("fixture")];
        let out = courses_to_csv(&score_courses(&courses)).expect("csv");
        let mut lines = out.lines();
        assert!(lines.next().expect("header").starts_with("course_id,title"));
        assert!(lines.next().expect("row").contains("Async Rust"));
    }

    #[test]
    fn kpi_export_is_metric_value_pairs() {
        let out = kpis_to_csv(&aggregate_kpis(&MetricsReport::default())).expect("csv");
        assert!(out.contains("metric,value"));
        assert!(out.contains("success_rate,0.00"));
    }
}
