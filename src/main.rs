mod auth;
mod dto;
mod error;
mod handlers;
mod models;
mod repository;
mod sanitize;
mod service;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
};

use std::{env, sync::Arc};

use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::rest::{self, AppState};
use repository::Repository;
use service::{FolderService, NoteService};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Fetch env variables
    let database_dsn =
        env::var("PG_DSN").expect("database dsn must be provided as an ENV variable");
    let api_token =
        env::var("API_TOKEN").expect("api bearer token must be provided as an ENV variable");

    // Repository creation and migration
    let mut repo = Repository::new(database_dsn).await.unwrap_or_else(|e| {
        tracing::error!("Failed to establish database connection: {e}");
        panic!("failed to establish database connection: {e}");
    });

    repo.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    // Service creation: one shared store handle, injected into both services
    let repo = Arc::new(repo);
    let state = AppState {
        notes: NoteService::new(repo.clone()),
        folders: FolderService::new(repo),
        api_token: Arc::from(api_token.as_str()),
    };

    // Router config: /api is bearer-protected, health and swagger are open
    let router = Router::new()
        .route("/", any(root))
        .merge(rest::api_router(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tracing::info!("REST server starting, listening on {}", addr);

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }
}

async fn root() -> Response {
    (StatusCode::OK, "Hello from noteful server!").into_response()
}
