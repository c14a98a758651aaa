use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::advise::{AdviseResult, PlanStep};
use crate::catalog::CourseStats;
use crate::client::{BackendClient, ClientError};
use crate::config::Config;
use crate::course::{cache, ranking, ScoredCourse, SortKey};
use crate::metrics::aggregate::{accuracy_by_component, aggregate_kpis, cost_by_model};
use crate::profile::{Expertise, SkillDetail, UserProfile};

#[derive(Clone)]
struct ApiState {
    config: Config,
    backend: BackendClient,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

}

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        let status = match &error {
            ClientError::Transport { .. } => StatusCode::BAD_GATEWAY,
            ClientError::Api { status, .. } => *status,
            ClientError::InvalidPayload { .. } => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize)]
struct SkillInput {
    name: String,
    #[serde(default)]
    expertise: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RecommendationsRequest {
    #[serde(default)]
    skills: Vec<SkillInput>,
    goal_role: String,
    #[serde(default)]
    years_experience: u32,
    #[serde(default)]
    search_online: bool,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    top: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct RecommendationsResponse {
    courses: Vec<ScoredCourse>,
    summary: ranking::RecommendationSummary,
    plan: Vec<PlanStep>,
    gap_map: std::collections::BTreeMap<String, Vec<String>>,
    notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompareEntry {
    retrieval_mode: String,
    result: AdviseResult,
    ranked_courses: Vec<ScoredCourse>,
}

#[derive(Debug, Serialize)]
struct CompareResponse {
    runs: Vec<CompareEntry>,
}

#[derive(Debug, Serialize)]
struct KpisResponse {
    kpis: crate::metrics::aggregate::AggregateKpis,
    accuracy_by_component: std::collections::BTreeMap<String, f64>,
    cost_by_model: std::collections::BTreeMap<String, f64>,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let state = ApiState {
        backend: BackendClient::new(&config.backend),
        config,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/recommendations", post(recommendations))
        .route("/v1/compare", post(compare))
        .route("/v1/kpis", get(kpis))
        .route("/v1/stats", get(stats))
        .route("/v1/config", get(show_config))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("bridge API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse { status: "ok" })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn recommendations(
    State(state): State<ApiState>,
    Json(request): Json<RecommendationsRequest>,
) -> ApiResult<RecommendationsResponse> {
    let (profile, filter, sort, top) = resolve_request(&state, &request)?;
    let result = state.backend.advise(&profile).await?;

    let mut ranked = ranking::rank_courses(&cache::scored(&result.recommended_courses), &filter, sort);
    if let Some(top) = top {
        ranked.truncate(top);
    }
    let summary = ranking::summarize_ranked(&ranked);

    Ok(ok(RecommendationsResponse {
        courses: ranked,
        summary,
        plan: result.plan,
        gap_map: result.gap_map,
        notes: result.notes,
    }))
}

async fn compare(
    State(state): State<ApiState>,
    Json(request): Json<RecommendationsRequest>,
) -> ApiResult<CompareResponse> {
    let (profile, filter, sort, top) = resolve_request(&state, &request)?;
    let results = state.backend.advise_compare(&profile).await?;

    let runs = results
        .into_iter()
        .map(|result| {
            let mut ranked =
                ranking::rank_courses(&cache::scored(&result.recommended_courses), &filter, sort);
            if let Some(top) = top {
                ranked.truncate(top);
            }
            CompareEntry {
                retrieval_mode: result.retrieval_mode().to_string(),
                ranked_courses: ranked,
                result,
            }
        })
        .collect();

    Ok(ok(CompareResponse { runs }))
}

async fn kpis(State(state): State<ApiState>) -> ApiResult<KpisResponse> {
    let report = state.backend.metrics_report().await?;
    Ok(ok(KpisResponse {
        kpis: aggregate_kpis(&report),
        accuracy_by_component: accuracy_by_component(&report),
        cost_by_model: cost_by_model(&report),
    }))
}

async fn stats(State(state): State<ApiState>) -> ApiResult<CourseStats> {
    Ok(ok(state.backend.course_stats().await?))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn resolve_request(
    state: &ApiState,
    request: &RecommendationsRequest,
) -> std::result::Result<(UserProfile, String, SortKey, Option<usize>), ApiError> {
    if request.goal_role.trim().is_empty() {
        return Err(ApiError::bad_request("goal_role is required"));
    }
    let skills = parse_skills(&request.skills)?;

    let sort_raw = request
        .sort
        .clone()
        .unwrap_or_else(|| state.config.display.default_sort.clone());
    let sort =
        SortKey::from_str(&sort_raw).map_err(|error| ApiError::bad_request(error.to_string()))?;
    let filter = request
        .difficulty
        .clone()
        .unwrap_or_else(|| state.config.display.default_difficulty.clone());
    let top = request.top.or(state.config.display.top);

    Ok((
        UserProfile {
            skills,
            years_experience: request.years_experience,
            goal_role: request.goal_role.trim().to_string(),
            search_online: request.search_online,
        },
        filter,
        sort,
        top,
    ))
}

fn parse_skills(inputs: &[SkillInput]) -> std::result::Result<Vec<SkillDetail>, ApiError> {
    let mut skills = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ApiError::bad_request("skill entry has an empty name"));
        }
        let expertise = match input.expertise.as_deref() {
            Some(level) => Expertise::from_str(level)
                .map_err(|error| ApiError::bad_request(error.to_string()))?,
            None => Expertise::Beginner,
        };
        skills.push(SkillDetail {
            name: name.to_string(),
            expertise,
        });
    }
    if skills.is_empty() {
        return Err(ApiError::bad_request("at least one skill is required"));
    }
    Ok(skills)
}
