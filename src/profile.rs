use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Self-assessed level for one skill, as the backend expects it
/// (capitalized variant names on the wire).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Expertise {
    Beginner,
    Intermediate,
    Advanced,
}

impl Display for Expertise {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown expertise level: {0}")]
pub struct ExpertiseParseError(pub String);

impl FromStr for Expertise {
    type Err = ExpertiseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "beginner" | "basic" => Ok(Self::Beginner),
            "intermediate" | "mid" => Ok(Self::Intermediate),
            "advanced" | "expert" => Ok(Self::Advanced),
            _ => Err(ExpertiseParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillDetail {
    pub name: String,
    pub expertise: Expertise,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub skills: Vec<SkillDetail>,
    pub years_experience: u32,
    pub goal_role: String,
    pub search_online: bool,
}

/// Parses a comma-separated `name[:level]` skill list, e.g.
/// `"python:advanced, sql, rust:beginner"`. Entries without a level
/// default to beginner.
pub fn parse_skill_list(raw: &str) -> Result<Vec<SkillDetail>> {
    let mut out = Vec::new();
    for piece in raw.split(',') {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (name, expertise) = match trimmed.split_once(':') {
            Some((name, level)) => (name.trim(), Expertise::from_str(level)?),
            None => (trimmed, Expertise::Beginner),
        };
        if name.is_empty() {
            return Err(anyhow!("skill entry has no name: {trimmed}"));
        }
        out.push(SkillDetail {
            name: name.to_string(),
            expertise,
        });
    }
    if out.is_empty() {
        return Err(anyhow!("skill list is empty"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{parse_skill_list, Expertise};

    #[test]
    fn parses_skills_with_and_without_levels() {
        let skills = parse_skill_list("python:advanced, sql , rust:Beginner")
            .expect("failed to parse skill list");
        assert_eq!(skills.len(), 3);
        assert_eq!(skills[0].name, "python");
        assert_eq!(skills[0].expertise, Expertise::Advanced);
        assert_eq!(skills[1].expertise, Expertise::Beginner);
    }

    #[test]
    fn rejects_empty_list_and_unknown_levels() {
        assert!(parse_skill_list(" , ,").is_err());
        assert!(parse_skill_list("python:wizard").is_err());
    }

    #[test]
    fn expertise_serializes_capitalized() {
        let json = serde_json::to_string(&Expertise::Intermediate).expect("serialize");
        assert_eq!(json, "\"Intermediate\"");
    }
}
