//! CrowdfundFix Server
//!
//! HTTP API over the marketplace.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::{MarketError, MarketResult};
use crate::marketplace::{
    AnalysisResponse, Dashboard, DeveloperSummary, FixVerificationRequest, FundingSummary,
    Marketplace, NewBug, NewUser,
};
use crate::storage::{BugRecord, FundingRecord, UserRecord};
use crate::types::{MatchResult, VerificationResult};

pub struct AppState {
    pub marketplace: Arc<Marketplace>,
    pub app_name: String,
    pub started_at: Instant,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/users", post(register_user_handler))
        .route("/api/v1/developers", get(list_developers_handler))
        .route("/api/v1/bugs", post(create_bug_handler).get(list_bugs_handler))
        .route("/api/v1/bugs/:id", get(get_bug_handler))
        .route("/api/v1/bugs/:id/status", patch(update_status_handler))
        .route("/api/v1/ai/analyze-bug", post(analyze_bug_handler))
        .route("/api/v1/ai/match-developers/:id", get(match_developers_handler))
        .route(
            "/api/v1/fund/:id",
            post(add_funding_handler).get(funding_summary_handler),
        )
        .route("/api/v1/verify-fix", post(verify_fix_handler))
        .route("/api/v1/analytics/dashboard", get(dashboard_handler))
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({}ms)",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_millis()
    );
    response
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.app_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

// ============================================================================
// Users
// ============================================================================

async fn register_user_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewUser>,
) -> MarketResult<Json<UserRecord>> {
    state.marketplace.register_user(request).map(Json)
}

async fn list_developers_handler(
    State(state): State<Arc<AppState>>,
) -> MarketResult<Json<Vec<DeveloperSummary>>> {
    state.marketplace.list_developers().map(Json)
}

// ============================================================================
// Bugs
// ============================================================================

async fn create_bug_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewBug>,
) -> MarketResult<Json<BugRecord>> {
    state.marketplace.create_bug(request).map(Json)
}

async fn list_bugs_handler(
    State(state): State<Arc<AppState>>,
) -> MarketResult<Json<Vec<BugRecord>>> {
    state.marketplace.list_bugs().map(Json)
}

async fn get_bug_handler(
    State(state): State<Arc<AppState>>,
    Path(bug_id): Path<String>,
) -> MarketResult<Json<BugRecord>> {
    state.marketplace.get_bug(&bug_id).map(Json)
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    Path(bug_id): Path<String>,
    Json(request): Json<StatusUpdate>,
) -> MarketResult<Json<BugRecord>> {
    state
        .marketplace
        .update_bug_status(&bug_id, &request.status)
        .map(Json)
}

// ============================================================================
// AI engines
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub bug_id: String,
}

async fn analyze_bug_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> MarketResult<Json<AnalysisResponse>> {
    state.marketplace.analyze_bug(&request.bug_id).map(Json)
}

async fn match_developers_handler(
    State(state): State<Arc<AppState>>,
    Path(bug_id): Path<String>,
) -> MarketResult<Json<Vec<MatchResult>>> {
    let matches = state.marketplace.match_developers(&bug_id)?;
    if matches.is_empty() {
        return Err(MarketError::NotFound(
            "Bug or available developers".to_string(),
        ));
    }
    Ok(Json(matches))
}

async fn verify_fix_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FixVerificationRequest>,
) -> Json<VerificationResult> {
    Json(state.marketplace.verify_fix(&request))
}

// ============================================================================
// Funding
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FundingRequest {
    pub contributor_name: String,
    pub amount: f64,
}

async fn add_funding_handler(
    State(state): State<Arc<AppState>>,
    Path(bug_id): Path<String>,
    Json(request): Json<FundingRequest>,
) -> MarketResult<Json<FundingRecord>> {
    state
        .marketplace
        .add_funding(&bug_id, &request.contributor_name, request.amount)
        .map(Json)
}

async fn funding_summary_handler(
    State(state): State<Arc<AppState>>,
    Path(bug_id): Path<String>,
) -> MarketResult<Json<FundingSummary>> {
    state.marketplace.funding_summary(&bug_id).map(Json)
}

// ============================================================================
// Analytics
// ============================================================================

async fn dashboard_handler(State(state): State<Arc<AppState>>) -> MarketResult<Json<Dashboard>> {
    state.marketplace.dashboard().map(Json)
}

/// Run the server
pub async fn run_server(
    host: &str,
    port: u16,
    app_name: &str,
    marketplace: Arc<Marketplace>,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        marketplace,
        app_name: app_name.to_string(),
        started_at: Instant::now(),
    });

    let app = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!("Starting {} server on {}", app_name, addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
