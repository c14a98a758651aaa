use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::advise::AdviseResult;
use crate::catalog::{CourseStats, SearchFilters, SearchResponse};
use crate::config::BackendConfig;
use crate::metrics::MetricsReport;
use crate::profile::{SkillDetail, UserProfile};

const USER_AGENT: &str = concat!("upskill-advisor/", env!("CARGO_PKG_VERSION"));

/// Failure taxonomy for backend calls. Missing optional fields in a 2xx
/// payload are never an error; they default during deserialization.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("invalid response payload from {url}: {source}")]
    InvalidPayload {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Envelope every backend endpoint wraps its data in.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub status: String,
    pub data: T,
}

#[derive(Debug, Serialize)]
struct AdviseRequest<'a> {
    profile: ProfilePayload<'a>,
    user_context: Map<String, Value>,
    search_online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    retrieval_mode: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct ProfilePayload<'a> {
    current_skills: &'a [SkillDetail],
    goal_role: &'a str,
    years_experience: u32,
}

impl<'a> AdviseRequest<'a> {
    fn new(profile: &'a UserProfile, retrieval_mode: Option<&'static str>) -> Self {
        Self {
            profile: ProfilePayload {
                current_skills: &profile.skills,
                goal_role: &profile.goal_role,
                years_experience: profile.years_experience,
            },
            user_context: Map::new(),
            search_online: profile.search_online,
            retrieval_mode,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn advise(&self, profile: &UserProfile) -> Result<AdviseResult, ClientError> {
        self.post("/api/v1/advise", &AdviseRequest::new(profile, Some("hybrid")))
            .await
    }

    /// The same profile evaluated under each retrieval mode the backend
    /// supports, for the side-by-side comparison view.
    pub async fn advise_compare(
        &self,
        profile: &UserProfile,
    ) -> Result<Vec<AdviseResult>, ClientError> {
        self.post("/api/v1/advise/compare", &AdviseRequest::new(profile, None))
            .await
    }

    pub async fn metrics_report(&self) -> Result<MetricsReport, ClientError> {
        self.get("/api/v1/metrics/reports", &[]).await
    }

    pub async fn course_stats(&self) -> Result<CourseStats, ClientError> {
        self.get("/api/v1/courses/stats", &[]).await
    }

    pub async fn search_courses(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchResponse, ClientError> {
        self.get("/api/v1/courses/search", &filters.to_query(query))
            .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::unwrap_envelope(url, response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::unwrap_envelope(url, response).await
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        url: String,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status,
                message: extract_api_message(&body)
                    .unwrap_or_else(|| format!("backend returned {status} for {url}")),
            });
        }
        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
            .map_err(|source| ClientError::InvalidPayload { url, source })?;
        Ok(envelope.data)
    }
}

/// Pulls a human-readable message out of an error body, preferring the
/// backend's `detail` field, then `error`.
fn extract_api_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    for key in ["detail", "error", "message"] {
        if let Some(message) = value.get(key).and_then(Value::as_str) {
            let trimmed = message.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{extract_api_message, ApiEnvelope};
    use crate::advise::AdviseResult;

    #[test]
    fn envelope_unwraps_data() {
        let envelope: ApiEnvelope<AdviseResult> = serde_json::from_value(json!({
            "request_id": "req-42",
            "status": "ok",
            "data": {
                "recommended_courses": [{"course_id": "c-1", "title": "Rust"}]
            }
        }))
        .expect("failed to parse envelope");
        assert_eq!(envelope.request_id, "req-42");
        assert_eq!(envelope.data.recommended_courses.len(), 1);
    }

    #[test]
    fn envelope_tolerates_missing_header_fields() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_value(json!({"data": [1, 2, 3]})).expect("parse");
        assert!(envelope.status.is_empty());
        assert_eq!(envelope.data, vec![1, 2, 3]);
    }

    #[test]
    fn api_message_prefers_detail_then_error() {
        assert_eq!(
            extract_api_message(r#"{"detail": "profile has no skills"}"#).as_deref(),
            Some("profile has no skills")
        );
        assert_eq!(
            extract_api_message(r#"{"error": "boom"}"#).as_deref(),
            Some("boom")
        );
        assert_eq!(extract_api_message("<html>gateway</html>"), None);
        assert_eq!(extract_api_message(r#"{"detail": "  "}"#), None);
    }
}
