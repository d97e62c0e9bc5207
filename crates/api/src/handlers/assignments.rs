//! Assignment Handlers
//!
//! API endpoints for assigning members to campuses and reading assignments
//! back. Status changes outside the defined workflows are deliberately not
//! routed.

use crate::handlers::{map_campus_error, ErrorResponse};
use crate::middleware::ActorContext;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use campus_models::{
    AssignMemberRequest, AssignmentStatus, AssignmentWithCampus, MemberCampusAssignment,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListByCampusQuery {
    pub campus_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AssignResponse {
    pub assignment_id: Uuid,
    pub status: AssignmentStatus,
    pub is_primary: bool,
}

#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub assignments: Vec<AssignmentWithCampus>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CampusAssignmentListResponse {
    pub assignments: Vec<MemberCampusAssignment>,
    pub total: usize,
}

/// Assign a member to a campus
/// POST /api/organizations/:org_id/campuses/:campus_id/members
pub async fn assign_member(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<ActorContext>,
    Path((org_id, campus_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<AssignMemberRequest>,
) -> Result<Json<AssignResponse>, (StatusCode, Json<ErrorResponse>)> {
    let assignment = state
        .assignment_service
        .assign(org_id, campus_id, request, Some(actor.actor_id))
        .await
        .map_err(map_campus_error)?;

    Ok(Json(AssignResponse {
        assignment_id: assignment.id,
        status: assignment.status,
        is_primary: assignment.is_primary,
    }))
}

/// List a member's assignments, primary first
/// GET /api/organizations/:org_id/members/:member_id/assignments
pub async fn list_member_assignments(
    State(state): State<Arc<AppState>>,
    Path((org_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AssignmentListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let assignments = state
        .assignment_service
        .list_for_member(member_id, org_id)
        .await
        .map_err(map_campus_error)?;

    let total = assignments.len();
    Ok(Json(AssignmentListResponse { assignments, total }))
}

/// List active assignments across the organization
/// GET /api/organizations/:org_id/assignments?campus_id=
pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListByCampusQuery>,
) -> Result<Json<CampusAssignmentListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let assignments = state
        .assignment_service
        .list_by_campus(org_id, query.campus_id)
        .await
        .map_err(map_campus_error)?;

    let total = assignments.len();
    Ok(Json(CampusAssignmentListResponse { assignments, total }))
}
