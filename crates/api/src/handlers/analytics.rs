use crate::handlers::{map_campus_error, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use campus_models::CampusStat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CampusStatsQuery {
    pub campus_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CampusStatsResponse {
    pub stats: Vec<CampusStat>,
    pub total: usize,
}

/// Per-campus membership rollups
/// GET /api/organizations/:org_id/analytics/campus-stats?campus_id=
pub async fn campus_stats(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<CampusStatsQuery>,
) -> Result<Json<CampusStatsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let stats = state
        .analytics_service
        .campus_stats(org_id, query.campus_id)
        .await
        .map_err(map_campus_error)?;

    let total = stats.len();
    Ok(Json(CampusStatsResponse { stats, total }))
}
