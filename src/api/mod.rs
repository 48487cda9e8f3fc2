mod handlers;
pub mod middleware;

use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::db::Database;

pub use middleware::SecurityConfig;

/// Router with no authentication and permissive CORS.
pub fn create_router(db: Database) -> Router {
    create_router_with_security(db, SecurityConfig::disabled())
}

pub fn create_router_with_security(db: Database, security: SecurityConfig) -> Router {
    let api = Router::new()
        // Features
        .route(
            "/features",
            get(handlers::list_features).post(handlers::create_feature),
        )
        .route(
            "/features/{id}",
            get(handlers::get_feature)
                .put(handlers::update_feature)
                .delete(handlers::delete_feature),
        )
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route("/projects/{id}", get(handlers::get_project))
        .route(
            "/projects/{id}/tasks",
            get(handlers::list_project_tasks).post(handlers::create_task),
        )
        // Tasks
        .route(
            "/tasks/{id}",
            get(handlers::get_task).put(handlers::update_task),
        )
        .route_layer(from_fn_with_state(
            security.clone(),
            middleware::auth_middleware,
        ))
        // Health stays reachable without a key.
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security.cors_layer()),
        )
        .with_state(db)
}
