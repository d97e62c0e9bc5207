//! Transfer Handlers
//!
//! API endpoints for the transfer orchestrator and the append-only transfer
//! ledger.

use crate::handlers::{map_campus_error, ErrorResponse};
use crate::middleware::ActorContext;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use campus_models::{
    MemberTransferHistory, TransferHistoryQuery, TransferRequest, TransferResult,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct TransferHistoryResponse {
    pub transfers: Vec<MemberTransferHistory>,
    pub total: usize,
}

/// Transfer a member between two campuses
/// POST /api/organizations/:org_id/members/:member_id/transfer
pub async fn transfer_member(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<ActorContext>,
    Path((org_id, member_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResult>, (StatusCode, Json<ErrorResponse>)> {
    let result = state
        .transfer_service
        .transfer(org_id, member_id, request, Some(actor.actor_id))
        .await
        .map_err(map_campus_error)?;

    Ok(Json(result))
}

/// Query the transfer ledger, newest first
/// GET /api/organizations/:org_id/transfers?member_id=&limit=
pub async fn query_transfer_history(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<TransferHistoryQuery>,
) -> Result<Json<TransferHistoryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let transfers = state
        .transfer_service
        .history(org_id, query)
        .await
        .map_err(map_campus_error)?;

    let total = transfers.len();
    Ok(Json(TransferHistoryResponse { transfers, total }))
}
