use crate::handlers;
use crate::middleware;
use crate::AppState;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Campus directory (read-only)
        .route(
            "/api/organizations/:org_id/campuses",
            get(handlers::campuses::list_campuses),
        )
        // Assignments
        .route(
            "/api/organizations/:org_id/campuses/:campus_id/members",
            post(handlers::assignments::assign_member)
                .route_layer(from_fn(middleware::require_actor)),
        )
        .route(
            "/api/organizations/:org_id/members/:member_id/assignments",
            get(handlers::assignments::list_member_assignments),
        )
        .route(
            "/api/organizations/:org_id/assignments",
            get(handlers::assignments::list_assignments),
        )
        // Transfers and the transfer ledger
        .route(
            "/api/organizations/:org_id/members/:member_id/transfer",
            post(handlers::transfers::transfer_member)
                .route_layer(from_fn(middleware::require_actor)),
        )
        .route(
            "/api/organizations/:org_id/transfers",
            get(handlers::transfers::query_transfer_history),
        )
        // Campus-scoped roles
        .route(
            "/api/organizations/:org_id/campuses/:campus_id/members/:member_id/roles",
            post(handlers::roles::grant_role)
                .delete(handlers::roles::close_member_roles)
                .route_layer(from_fn(middleware::require_actor)),
        )
        .route(
            "/api/organizations/:org_id/members/:member_id/roles",
            get(handlers::roles::list_member_roles),
        )
        // Analytics rollups
        .route(
            "/api/organizations/:org_id/analytics/campus-stats",
            get(handlers::analytics::campus_stats),
        )
        .with_state(state)
}
