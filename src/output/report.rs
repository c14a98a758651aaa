use std::fmt::Write as _;

use chrono::Utc;

use crate::advise::AdviseResult;
use crate::course::ScoredCourse;
use crate::profile::UserProfile;

/// Plain-text study-plan report suitable for saving to a file. Takes the
/// already ranked course list so the report matches what was shown on screen.
pub fn render_plan_report(
    profile: &UserProfile,
    result: &AdviseResult,
    ranked: &[ScoredCourse],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "UPSKILL ADVISOR - LEARNING PLAN");
    let _ = writeln!(out, "Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "Goal role:  {}", profile.goal_role);
    let _ = writeln!(
        out,
        "Experience: {} years, {} current skills",
        profile.years_experience,
        profile.skills.len()
    );
    let _ = writeln!(out, "{}", "=".repeat(60));

    if !result.plan.is_empty() {
        let _ = writeln!(out, "\nPLAN");
        for (index, step) in result.plan.iter().enumerate() {
            let resource = step
                .course_id
                .as_deref()
                .and_then(|id| result.course_by_id(id))
                .map(|c| c.title.clone())
                .or_else(|| step.resource.clone())
                .unwrap_or_else(|| "self-study".to_string());
            let _ = writeln!(
                out,
                "{:>2}. [{}] {} -> {}",
                index + 1,
                step.action.as_deref().unwrap_or("learn"),
                step.skill.as_deref().unwrap_or("general"),
                resource
            );
            if let Some(why) = &step.why {
                let _ = writeln!(out, "    why: {why}");
            }
            if let Some(weeks) = step.estimated_weeks {
                let _ = writeln!(out, "    est: {weeks:.0} weeks");
            }
        }
    }

    if !result.gap_map.is_empty() {
        let _ = writeln!(out, "\nSKILL GAPS");
        for (skill, gaps) in &result.gap_map {
            let _ = writeln!(out, "  {skill}: {}", gaps.join(", "));
        }
    }

    if !ranked.is_empty() {
        let _ = writeln!(out, "\nRECOMMENDED COURSES");
        for course in ranked {
            let _ = writeln!(
                out,
                "  [{:>3.0}%] {} ({}, {})",
                course.recommendation_score,
                course.course.title,
                course.course.provider.as_deref().unwrap_or("unknown"),
                course
                    .course
                    .duration_weeks
                    .map(|w| format!("{w:.0} weeks"))
                    .unwrap_or_else(|| "duration n/a".to_string())
            );
        }
    }

    if let Some(timeline) = &result.timeline {
        let _ = writeln!(out, "\nTIMELINE ({:.0} weeks total)", timeline.total_weeks);
        for phase in &timeline.phases {
            let _ = writeln!(out, "  {} ({}): {}", phase.phase, phase.weeks, phase.focus);
        }
    }

    if let Some(notes) = &result.notes {
        let _ = writeln!(out, "\nNOTES\n{notes}");
    }

    out
}
