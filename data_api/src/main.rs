mod api;
mod state;

use crate::api::db::queries::PgStore;
use crate::state::AppState;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use shared::aladhan::AladhanClient;
use shared::{init_tracing, initialize_db, load_config, shutdown_listener};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::args().any(|arg| arg == "--export-bindings") {
        specta_typescript::Typescript::default()
            .bigint(specta_typescript::BigIntExportBehavior::Number)
            .export_to("./bindings.ts", &specta::export())?;
        return Ok(());
    }

    init_tracing()?;

    let config = load_config()?;
    let provider_config = config.provider();
    info!(
        name: "config.loaded",
        listen_addr = config.listen_addr(),
        provider_base_url = %provider_config.base_url,
        provider_method = provider_config.method,
        "config loaded"
    );

    let pool = initialize_db(&config.postgres, true).await?;
    let store = Arc::new(PgStore::new(pool));
    let provider = AladhanClient::new(
        reqwest::Client::new(),
        provider_config.base_url,
        provider_config.method,
    );
    let state = AppState::new(store.clone(), store, Arc::new(provider));

    let listen_addr = config.listen_addr();
    info!(name: "server.starting", "starting server at {listen_addr}");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_listener(None))
        .await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .nest("/api", api::router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
