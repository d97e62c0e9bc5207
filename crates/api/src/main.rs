// Campus Membership API Server
// Main entry point for the cross-campus member assignment & transfer REST API

mod config;
mod handlers;
mod middleware;
mod routes;

use config::Config;
use dotenvy::dotenv;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub struct AppState {
    pub db: campus_database::Database,
    pub assignment_service: campus_core::AssignmentService,
    pub role_service: campus_core::RoleService,
    pub transfer_service: campus_core::TransferService,
    pub analytics_service: campus_core::AnalyticsService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,campus_api=debug,tower_http=debug".to_string()),
        )
        .init();

    tracing::info!("🚀 Starting Campus Membership API Server");
    tracing::info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env();
    tracing::info!("🔌 Server: {}:{}", config.server_host, config.server_port);

    // Initialize database
    tracing::info!("🗄️  Connecting to database...");
    let database = campus_database::Database::new(config.database.clone())
        .await
        .expect("Failed to connect to database");
    database.ping().await.expect("Database ping failed");
    tracing::info!("✅ Database connected");

    // Create services
    let assignment_service = campus_core::AssignmentService::new(database.clone());
    tracing::info!("📍 Assignment service initialized");

    let role_service = campus_core::RoleService::new(database.clone());
    tracing::info!("🎖️  Role service initialized");

    let transfer_service = campus_core::TransferService::new(database.clone());
    tracing::info!("🔁 Transfer orchestrator initialized");

    let analytics_service = campus_core::AnalyticsService::new(database.clone());
    tracing::info!("📊 Analytics service initialized");

    // Create app state
    let state = Arc::new(AppState {
        db: database,
        assignment_service,
        role_service,
        transfer_service,
        analytics_service,
    });

    // Create router
    let app = routes::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    tracing::info!("📡 Routes configured:");
    tracing::info!("   GET    /health");
    tracing::info!("   GET    /api/organizations/:org_id/campuses");
    tracing::info!("   POST   /api/organizations/:org_id/campuses/:campus_id/members");
    tracing::info!("   GET    /api/organizations/:org_id/members/:member_id/assignments");
    tracing::info!("   GET    /api/organizations/:org_id/assignments");
    tracing::info!("   POST   /api/organizations/:org_id/members/:member_id/transfer");
    tracing::info!("   GET    /api/organizations/:org_id/transfers");
    tracing::info!("   POST   /api/organizations/:org_id/campuses/:campus_id/members/:member_id/roles");
    tracing::info!("   DELETE /api/organizations/:org_id/campuses/:campus_id/members/:member_id/roles");
    tracing::info!("   GET    /api/organizations/:org_id/members/:member_id/roles");
    tracing::info!("   GET    /api/organizations/:org_id/analytics/campus-stats");

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("✅ Server ready at http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");

    Ok(())
}
