use crate::course::{Difficulty, ScoredCourse, SortKey};

/// Filter value that bypasses difficulty filtering.
pub const FILTER_ALL: &str = "all";

/// Filters and orders a scored course list for presentation. Returns a new
/// vector; the input is never mutated. All sorts are stable, so ties keep
/// their relative input order.
pub fn rank_courses(courses: &[ScoredCourse], filter: &str, sort: SortKey) -> Vec<ScoredCourse> {
    let mut ranked: Vec<ScoredCourse> = courses
        .iter()
        .filter(|c| matches_difficulty(c, filter))
        .cloned()
        .collect();

    match sort {
        SortKey::Score => ranked.sort_by(|a, b| {
            b.recommendation_score.total_cmp(&a.recommendation_score)
        }),
        // Missing duration reads as 0 and therefore sorts first.
        SortKey::Duration => ranked.sort_by(|a, b| {
            a.course
                .duration_weeks
                .unwrap_or(0.0)
                .total_cmp(&b.course.duration_weeks.unwrap_or(0.0))
        }),
        SortKey::Difficulty => ranked.sort_by_key(|c| c.course.difficulty().sort_rank()),
        SortKey::Rating => ranked.sort_by(|a, b| {
            b.course
                .rating()
                .unwrap_or(0.0)
                .total_cmp(&a.course.rating().unwrap_or(0.0))
        }),
    }

    ranked
}

fn matches_difficulty(course: &ScoredCourse, filter: &str) -> bool {
    if filter.eq_ignore_ascii_case(FILTER_ALL) {
        return true;
    }
    course
        .course
        .difficulty
        .as_deref()
        .map(|d| d.eq_ignore_ascii_case(filter))
        .unwrap_or(false)
}

/// Convenience counts over a ranked list, shown in the recommendation
/// summary footer.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct RecommendationSummary {
    pub highly_recommended: usize,
    pub good_match: usize,
    pub avg_skill_match: f64,
    pub avg_duration_weeks: f64,
}

pub fn summarize_ranked(courses: &[ScoredCourse]) -> RecommendationSummary {
    let total = courses.len();
    let highly_recommended = courses
        .iter()
        .filter(|c| c.recommendation_score >= 80.0)
        .count();
    let good_match = courses
        .iter()
        .filter(|c| c.recommendation_score >= 60.0 && c.recommendation_score < 80.0)
        .count();
    let (avg_skill_match, avg_duration_weeks) = if total == 0 {
        (0.0, 0.0)
    } else {
        let skill_sum: f64 = courses.iter().map(|c| c.skill_match_percentage).sum();
        let duration_sum: f64 = courses
            .iter()
            .map(|c| c.course.duration_weeks.unwrap_or(0.0))
            .sum();
        (skill_sum / total as f64, duration_sum / total as f64)
    };
    RecommendationSummary {
        highly_recommended,
        good_match,
        avg_skill_match,
        avg_duration_weeks,
    }
}
