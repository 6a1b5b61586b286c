use crate::{
    api::models::*,
    core::{
        ingest::Viewer,
        models::{audit::AppLog, summary::GroupSummary, summary::Overview},
        services::LedgerService,
    },
    infrastructure::{
        cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::Utc;
use std::sync::Arc;

pub type AppService = LedgerService<InMemoryLogging, InMemoryStorage, InMemoryCache>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/users/{user_id}/overview", get(get_overview))
        .route("/users/{user_id}/groups/{group_id}", get(get_group_summary))
        .route("/users/{user_id}/activity", get(get_activity))
        .route("/splits/preview", post(preview_split))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/overview",
    params(
        ("user_id" = String, Path, description = "Viewing user"),
        ViewerQuery
    ),
    responses(
        (status = 200, description = "Groups and global balance of the user", body = Overview),
        (status = 400, description = "Malformed data in the store", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_overview(
    State(service): State<Arc<AppService>>,
    Path(user_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Overview>, ApiError> {
    let viewer = Viewer::new(user_id).with_email(query.email);
    let overview = service.overview(&viewer).await?;
    Ok(Json(overview))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/groups/{group_id}",
    params(
        ("user_id" = String, Path, description = "Viewing user"),
        ("group_id" = String, Path, description = "Group to summarize"),
        ViewerQuery
    ),
    responses(
        (status = 200, description = "Balances of every member", body = GroupSummary),
        (status = 400, description = "Malformed data in the store", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_group_summary(
    State(service): State<Arc<AppService>>,
    Path((user_id, group_id)): Path<(String, String)>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<GroupSummary>, ApiError> {
    let viewer = Viewer::new(user_id).with_email(query.email);
    let summary = service.group_summary(&group_id, &viewer).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/activity",
    params(
        ("user_id" = String, Path, description = "Viewing user"),
        ActivityQuery
    ),
    responses(
        (status = 200, description = "Recent expenses and settlements", body = Vec<ActivityItemResponse>),
        (status = 400, description = "Invalid limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_activity(
    State(service): State<Arc<AppService>>,
    Path(user_id): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityItemResponse>>, ApiError> {
    let viewer = Viewer::new(user_id).with_email(query.email);
    let items = service.activity(&viewer, query.limit).await?;
    let now = Utc::now();
    Ok(Json(
        items
            .into_iter()
            .map(|item| ActivityItemResponse::from_item(item, now))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/splits/preview",
    request_body = SplitPreviewRequest,
    responses(
        (status = 200, description = "Per-member shares", body = SplitPreviewResponse),
        (status = 400, description = "Invalid amount or weights", body = ErrorResponse)
    )
)]
pub async fn preview_split(
    State(service): State<Arc<AppService>>,
    Json(req): Json<SplitPreviewRequest>,
) -> Result<Json<SplitPreviewResponse>, ApiError> {
    let weights: Option<Vec<(String, rust_decimal::Decimal)>> = req
        .weights
        .map(|entries| entries.into_iter().map(|w| (w.member_id, w.weight)).collect());
    let allocation = service.preview_split(req.amount, &req.payer_id, &req.participant_ids, weights.as_deref())?;
    Ok(Json(SplitPreviewResponse {
        amount: req.amount,
        shares: allocation.iter().cloned().collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogsQuery),
    responses(
        (status = 200, description = "Recorded application logs", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_app_logs(
    State(service): State<Arc<AppService>>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs(query.action.as_deref()).await?;
    Ok(Json(logs))
}
