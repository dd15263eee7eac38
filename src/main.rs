use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use pm_api_rust::config::config;
use pm_api_rust::database::manager::DatabaseManager;
use pm_api_rust::handlers;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, FRONTEND_ORIGIN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting PM API in {:?} mode", config.environment);

    // Optional schema bootstrap, for local/dev setups
    if config.database.auto_create_tables {
        if let Err(e) = DatabaseManager::ensure_schema().await {
            tracing::error!("schema bootstrap failed: {}", e);
            std::process::exit(1);
        }
    }

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("PM API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(project_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn project_routes() -> Router {
    use handlers::projects;

    Router::new()
        .route("/api/projects/list", post(projects::list_post))
        .route("/api/projects", post(projects::create_post))
        .route("/api/projects/:id/status", patch(projects::status_patch))
}

fn cors_layer() -> CorsLayer {
    let security = &config().security;

    // "*" cannot be combined with credentials, so mirror the request origin
    // in that case
    let origin = match security.cors_origin.as_str() {
        "*" => AllowOrigin::mirror_request(),
        exact => match exact.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::error!("invalid FRONTEND_ORIGIN {:?}, mirroring request origin", exact);
                AllowOrigin::mirror_request()
            }
        },
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(security.cors_allow_credentials)
}

async fn health() -> impl axum::response::IntoResponse {
    match DatabaseManager::health_check().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "ok": false, "error": "database unavailable" })),
            )
        }
    }
}
