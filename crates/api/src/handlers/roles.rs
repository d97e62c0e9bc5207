//! Campus Role Handlers
//!
//! API endpoints for granting, listing, and closing campus-scoped role
//! grants.

use crate::handlers::{map_campus_error, ErrorResponse};
use crate::middleware::ActorContext;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use campus_models::{CampusMemberRole, GrantRoleRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListRolesQuery {
    pub campus_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RoleListResponse {
    pub roles: Vec<CampusMemberRole>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CloseRolesResponse {
    pub closed: Vec<CampusMemberRole>,
    pub total: usize,
}

/// Grant a campus-scoped role to a member
/// POST /api/organizations/:org_id/campuses/:campus_id/members/:member_id/roles
pub async fn grant_role(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<ActorContext>,
    Path((org_id, campus_id, member_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(request): Json<GrantRoleRequest>,
) -> Result<Json<CampusMemberRole>, (StatusCode, Json<ErrorResponse>)> {
    let role = state
        .role_service
        .grant(org_id, campus_id, member_id, request, Some(actor.actor_id))
        .await
        .map_err(map_campus_error)?;

    Ok(Json(role))
}

/// List a member's active role grants
/// GET /api/organizations/:org_id/members/:member_id/roles?campus_id=
pub async fn list_member_roles(
    State(state): State<Arc<AppState>>,
    Path((_org_id, member_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ListRolesQuery>,
) -> Result<Json<RoleListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let roles = state
        .role_service
        .list_active(member_id, query.campus_id)
        .await
        .map_err(map_campus_error)?;

    let total = roles.len();
    Ok(Json(RoleListResponse { roles, total }))
}

/// Close all active role grants for a member at a campus
/// DELETE /api/organizations/:org_id/campuses/:campus_id/members/:member_id/roles
pub async fn close_member_roles(
    State(state): State<Arc<AppState>>,
    Extension(_actor): Extension<ActorContext>,
    Path((_org_id, campus_id, member_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<CloseRolesResponse>, (StatusCode, Json<ErrorResponse>)> {
    let closed = state
        .role_service
        .close_roles(campus_id, member_id)
        .await
        .map_err(map_campus_error)?;

    let total = closed.len();
    Ok(Json(CloseRolesResponse { closed, total }))
}
