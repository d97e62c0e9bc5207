use crate::handlers::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use campus_database::CampusRepository;
use campus_models::Campus;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CampusListResponse {
    pub campuses: Vec<Campus>,
    pub total: usize,
}

/// List the campuses of an organization
/// GET /api/organizations/:org_id/campuses
pub async fn list_campuses(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<CampusListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let repo = CampusRepository::new(state.db.pool().clone());

    match repo.list_by_organization(org_id).await {
        Ok(campuses) => {
            let total = campuses.len();
            Ok(Json(CampusListResponse { campuses, total }))
        }
        Err(e) => {
            tracing::error!("Failed to list campuses: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("list_failed", "Failed to list campuses")),
            ))
        }
    }
}
