pub mod cache;
pub mod ranking;
pub mod scoring;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A course record as the backend returns it. Every field beyond the id and
/// title is optional on the wire; missing values are defaulted downstream
/// rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration_weeks: Option<f64>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Course {
    /// Star rating from metadata, 0-5. Malformed values read as absent.
    pub fn rating(&self) -> Option<f64> {
        self.metadata.get("rating").and_then(metadata_number)
    }

    pub fn enrollment_count(&self) -> Option<f64> {
        self.metadata
            .get("enrollment_count")
            .and_then(metadata_number)
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::parse(self.difficulty.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Unknown,
}

impl Difficulty {
    /// Lossless parse: anything unrecognized (including absence) maps to
    /// `Unknown` instead of failing.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Unknown,
        }
    }

    /// Fixed display order: beginner < intermediate < advanced < unknown.
    pub fn sort_rank(self) -> u8 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
            Self::Unknown => 3,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Unknown => "Unknown",
        };
        write!(f, "{display}")
    }
}

/// A course plus the derived view-model fields the dashboard and report
/// render. Recomputed whole from the input list, never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredCourse {
    #[serde(flatten)]
    pub course: Course,
    pub recommendation_score: f64,
    pub skill_match_percentage: f64,
    pub difficulty_match: bool,
    pub popularity_score: f64,
    pub score_breakdown: ScoreBreakdown,
}

/// The four raw contributions whose sum (clamped to 100) is the
/// recommendation score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub rating: f64,
    pub skills: f64,
    pub duration: f64,
    pub provider: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Score,
    Duration,
    Difficulty,
    Rating,
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Score => "score",
            Self::Duration => "duration",
            Self::Difficulty => "difficulty",
            Self::Rating => "rating",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown sort key: {0}")]
pub struct SortKeyParseError(pub String);

impl FromStr for SortKey {
    type Err = SortKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(Self::Score),
            "duration" => Ok(Self::Duration),
            "difficulty" => Ok(Self::Difficulty),
            "rating" => Ok(Self::Rating),
            _ => Err(SortKeyParseError(s.to_string())),
        }
    }
}

fn metadata_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(metadata_number))
}
