use std::collections::BTreeMap;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::advise::AdviseResult;
use crate::catalog::CourseStats;
use crate::course::ScoredCourse;
use crate::metrics::aggregate::AggregateKpis;

pub fn render_courses_table(courses: &[ScoredCourse]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Title",
        "Provider",
        "Difficulty",
        "Weeks",
        "Rating",
        "Skill Match",
        "Score",
    ]);

    for c in courses {
        let score = c.recommendation_score;
        let score_cell = if score >= 80.0 {
            Cell::new(format!("{score:.0}%")).fg(Color::Green)
        } else if score >= 60.0 {
            Cell::new(format!("{score:.0}%")).fg(Color::Yellow)
        } else {
            Cell::new(format!("{score:.0}%")).fg(Color::Red)
        };
        table.add_row(Row::from(vec![
            Cell::new(&c.course.title),
            Cell::new(c.course.provider.as_deref().unwrap_or("-")),
            Cell::new(c.course.difficulty().to_string()),
            Cell::new(
                c.course
                    .duration_weeks
                    .map(|w| format!("{w:.0}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(
                c.course
                    .rating()
                    .map(|r| format!("{r:.1}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(format!("{:.0}%", c.skill_match_percentage)),
            score_cell,
        ]));
    }
    table.to_string()
}

pub fn render_plan_table(result: &AdviseResult) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Step", "Skill", "Action", "Course / Resource", "Weeks"]);

    for (index, step) in result.plan.iter().enumerate() {
        let linked_title = step
            .course_id
            .as_deref()
            .and_then(|id| result.course_by_id(id))
            .map(|c| c.title.clone());
        let resource = linked_title
            .or_else(|| step.resource.clone())
            .or_else(|| step.course_id.clone())
            .unwrap_or_else(|| "Learning step".to_string());
        table.add_row(vec![
            (index + 1).to_string(),
            step.skill.clone().unwrap_or_default(),
            step.action
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_default(),
            resource,
            step.estimated_weeks
                .map(|w| format!("{w:.0}"))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_kpis_table(kpis: &AggregateKpis) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["KPI", "Value", "Detail"]);

    table.add_row(vec![
        "Total cost".to_string(),
        format!("${:.4}", kpis.total_cost),
        format!("${:.6} per request", kpis.cost_per_request),
    ]);
    table.add_row(vec![
        "Success rate".to_string(),
        format!("{:.1}%", kpis.success_rate),
        format!(
            "{}/{} requests",
            kpis.successful_requests, kpis.total_requests
        ),
    ]);
    table.add_row(Row::from(vec![
        Cell::new("Avg response time"),
        Cell::new(format!("{:.0}ms", kpis.avg_response_time)),
        if kpis.performance_target_met {
            Cell::new("target met (2.5s)").fg(Color::Green)
        } else {
            Cell::new("below target (2.5s)").fg(Color::Red)
        },
    ]));
    table.add_row(vec![
        "Avg accuracy".to_string(),
        format!("{:.1}%", kpis.avg_accuracy * 100.0),
        format!("{} trend vs previous window", signed_pct(kpis.accuracy_trend_pct)),
    ]);
    table.add_row(vec![
        "Latency trend".to_string(),
        signed_pct(kpis.latency_trend_pct),
        "last 10 vs previous 10".to_string(),
    ]);
    table.to_string()
}

pub fn render_component_accuracy_table(grouped: &BTreeMap<String, f64>) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Component", "Avg Accuracy"]);
    for (component, accuracy) in grouped {
        table.add_row(vec![
            component.clone(),
            format!("{:.1}%", accuracy * 100.0),
        ]);
    }
    table.to_string()
}

pub fn render_cost_by_model_table(grouped: &BTreeMap<String, f64>) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Model", "Cost (USD)"]);
    for (model, cost) in grouped {
        table.add_row(vec![model.clone(), format!("${cost:.4}")]);
    }
    table.to_string()
}

pub fn render_stats_tables(stats: &CourseStats) -> String {
    let mut providers = Table::new();
    providers
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    providers.set_header(vec!["Provider", "Courses"]);
    for (provider, count) in stats.providers_ranked() {
        providers.add_row(vec![provider, count.to_string()]);
    }

    let mut difficulties = Table::new();
    difficulties
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    difficulties.set_header(vec!["Difficulty", "Courses"]);
    for (difficulty, count) in stats.difficulties_ranked() {
        difficulties.add_row(vec![difficulty, count.to_string()]);
    }

    format!(
        "Catalog: {} courses\n\n{providers}\n\n{difficulties}",
        stats.total_courses
    )
}

pub fn render_comparison_table(results: &[AdviseResult]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Mode",
        "Coverage",
        "Diversity",
        "Duration",
        "Courses",
        "Top Course",
    ]);

    for result in results {
        let metrics = result.metrics.as_ref();
        table.add_row(vec![
            result.retrieval_mode().to_string(),
            metrics
                .and_then(|m| m.coverage)
                .map(|v| format!("{:.0}%", v * 100.0))
                .unwrap_or_else(|| "-".to_string()),
            metrics
                .and_then(|m| m.diversity)
                .map(|v| format!("{:.0}%", v * 100.0))
                .unwrap_or_else(|| "-".to_string()),
            metrics
                .and_then(|m| m.duration_ms)
                .map(|v| format!("{v:.0}ms"))
                .unwrap_or_else(|| "-".to_string()),
            result.recommended_courses.len().to_string(),
            result
                .recommended_courses
                .first()
                .map(|c| c.title.clone())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}

fn signed_pct(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.1}%")
    } else {
        format!("{value:.1}%")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_courses_table, render_kpis_table, signed_pct};
    use crate::course::scoring::score_courses;
    use crate::course::Course;
    use crate::metrics::aggregate::aggregate_kpis;
    use crate::metrics::MetricsReport;

    #[test]
    fn courses_table_includes_titles_and_scores() {
        let courses: Vec<Course> = vec![serde_json::from_value(json!({
            "course_id": "c-1",
            "title": "Rust in Motion",
            "provider": "Coursera",
            "duration_weeks": 4
        }))
        .expect("fixture")];
        let rendered = render_courses_table(&score_courses(&courses));
        assert!(rendered.contains("Rust in Motion"));
        assert!(rendered.contains("Coursera"));
    }

    #[test]
    fn kpis_table_renders_for_empty_report() {
        let rendered = render_kpis_table(&aggregate_kpis(&MetricsReport::default()));
        assert!(rendered.contains("Success rate"));
        assert!(rendered.contains("0.0%"));
    }

    #[test]
    fn trend_values_carry_a_sign_prefix() {
        assert_eq!(signed_pct(12.34), "+12.3%");
        assert_eq!(signed_pct(-3.2), "-3.2%");
        assert_eq!(signed_pct(0.0), "0.0%");
    }
}
