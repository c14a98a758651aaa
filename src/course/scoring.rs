use crate::course::{Course, Difficulty, ScoreBreakdown, ScoredCourse};

const DEFAULT_RATING: f64 = 3.5;
const DEFAULT_DURATION_WEEKS: f64 = 4.0;
const DEFAULT_ENROLLMENT: f64 = 1000.0;
const SKILL_MATCH_CAP: f64 = 95.0;
const SKILL_MATCH_FLOOR: f64 = 30.0;

/// Derives a [`ScoredCourse`] per input course, same length and order as the
/// input. Ranking is a separate step; this never reorders and never fails.
pub fn score_courses(courses: &[Course]) -> Vec<ScoredCourse> {
    courses.iter().map(score_course).collect()
}

pub fn score_course(course: &Course) -> ScoredCourse {
    let skill_match_percentage = skill_match_percentage(&course.skills);

    // Unrated courses read as a neutral 3.5/5.
    let rating = course.rating().unwrap_or(DEFAULT_RATING) / 5.0 * 30.0;
    let skills = skill_match_percentage * 0.4;
    let duration_weeks = course.duration_weeks.unwrap_or(DEFAULT_DURATION_WEEKS);
    let duration = (20.0 - duration_weeks * 2.0).max(0.0);
    let provider = provider_score(course.provider.as_deref());

    let breakdown = ScoreBreakdown {
        rating,
        skills,
        duration,
        provider,
    };
    // Metadata numbers are untrusted; both derived fields stay in [0, 100]
    // even for out-of-domain ratings or negative enrollment counts.
    let recommendation_score = (rating + skills + duration + provider).clamp(0.0, 100.0);

    let enrollment = course.enrollment_count().unwrap_or(DEFAULT_ENROLLMENT);
    let popularity_score = (enrollment / 50.0).clamp(0.0, 100.0);

    ScoredCourse {
        difficulty_match: course.difficulty() != Difficulty::Advanced,
        recommendation_score,
        skill_match_percentage,
        popularity_score,
        score_breakdown: breakdown,
        course: course.clone(),
    }
}

/// Coarse relevance heuristic: more listed skills reads as broader coverage.
/// Not a semantic match against the user's goal.
fn skill_match_percentage(skills: &[String]) -> f64 {
    if skills.is_empty() {
        return SKILL_MATCH_FLOOR;
    }
    (skills.len() as f64 * 15.0 + 20.0).min(SKILL_MATCH_CAP)
}

/// Tiered provider reputation on a case-insensitive substring match. The
/// tier sets are disjoint, so first match wins without ambiguity.
fn provider_score(provider: Option<&str>) -> f64 {
    let Some(provider) = provider else {
        return 5.0;
    };
    let provider = provider.to_ascii_lowercase();
    if provider.contains("coursera") || provider.contains("edx") {
        15.0
    } else if provider.contains("udacity") || provider.contains("pluralsight") {
        12.0
    } else if provider.contains("linkedin") || provider.contains("udemy") {
        10.0
    } else {
        5.0
    }
}
