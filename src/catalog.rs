use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::course::Course;

/// Catalog-wide statistics from the course-statistics endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CourseStats {
    #[serde(default)]
    pub total_courses: u64,
    #[serde(default)]
    pub providers: BTreeMap<String, u64>,
    #[serde(default)]
    pub difficulties: BTreeMap<String, u64>,
    #[serde(default)]
    pub categories: BTreeMap<String, u64>,
    #[serde(default)]
    pub top_skills: BTreeMap<String, u64>,
}

impl CourseStats {
    /// Provider counts ordered by count descending, for charts and tables.
    pub fn providers_ranked(&self) -> Vec<(String, u64)> {
        ranked(&self.providers)
    }

    pub fn difficulties_ranked(&self) -> Vec<(String, u64)> {
        ranked(&self.difficulties)
    }

    pub fn top_skills_ranked(&self) -> Vec<(String, u64)> {
        ranked(&self.top_skills)
    }
}

fn ranked(counts: &BTreeMap<String, u64>) -> Vec<(String, u64)> {
    let mut out: Vec<(String, u64)> = counts
        .iter()
        .map(|(name, count)| (name.clone(), *count))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub pagination: Value,
}

/// Filter arrays for the course-search endpoint. Empty vectors are omitted
/// from the query string.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub providers: Vec<String>,
    pub difficulties: Vec<String>,
    pub skills: Vec<String>,
    pub categories: Vec<String>,
    pub is_free: Option<bool>,
}

impl SearchFilters {
    pub fn to_query(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !query.trim().is_empty() {
            params.push(("query", query.trim().to_string()));
        }
        for provider in &self.providers {
            params.push(("providers", provider.clone()));
        }
        for difficulty in &self.difficulties {
            params.push(("difficulties", difficulty.clone()));
        }
        for skill in &self.skills {
            params.push(("skills", skill.clone()));
        }
        for category in &self.categories {
            params.push(("categories", category.clone()));
        }
        if let Some(is_free) = self.is_free {
            params.push(("is_free", is_free.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CourseStats, SearchFilters};

    #[test]
    fn ranked_counts_sort_descending() {
        let stats: CourseStats = serde_json::from_value(json!({
            "total_courses": 12,
            "providers": {"edX": 3, "Coursera": 7, "Udemy": 2}
        }))
        .expect("failed to parse stats");
        let ranked = stats.providers_ranked();
        assert_eq!(ranked[0], ("Coursera".to_string(), 7));
        assert_eq!(ranked[2], ("Udemy".to_string(), 2));
        assert!(stats.difficulties_ranked().is_empty());
    }

    #[test]
    fn search_filters_build_repeated_params() {
        let filters = SearchFilters {
            providers: vec!["edX".to_string(), "Coursera".to_string()],
            is_free: Some(true),
            ..Default::default()
        };
        let params = filters.to_query("rust async");
        assert_eq!(params[0], ("query", "rust async".to_string()));
        assert_eq!(
            params.iter().filter(|(k, _)| *k == "providers").count(),
            2
        );
        assert!(params.contains(&("is_free", "true".to_string())));
    }
}
