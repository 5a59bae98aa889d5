// Server module - HTTP server setup and routing
pub mod handlers;
pub mod state;
pub mod voter;

use std::net::SocketAddr;

use axum::{
    Router,
    http::HeaderValue,
    routing::{MethodRouter, get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use self::state::AppState;
use crate::config::create_cors_layer;
use crate::errors::StartupError;

/// Registers `method_router` under `path` both with and without a trailing slash.
fn route_both(router: Router<AppState>, path: &str, method_router: MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    let router = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/pins/:pin_id", get(handlers::pins::get_pin))
        .route("/survey/user/:identity", get(handlers::survey::get_entry))
        .route("/auth/discord/callback", get(handlers::auth::discord_callback))
        .route("/admin/reset-db", post(handlers::admin::reset_db));

    let router = route_both(
        router,
        "/pins",
        get(handlers::pins::list_pins).post(handlers::pins::create_pin),
    );
    let router = route_both(router, "/pins/vote", post(handlers::votes::cast_vote));
    let router = route_both(router, "/pins/votes", get(handlers::votes::list_votes));
    let router = route_both(
        router,
        "/survey",
        get(handlers::survey::list_entries).post(handlers::survey::submit_survey),
    );
    let router = route_both(router, "/survey/definition", get(handlers::survey::get_definition));
    let router = route_both(router, "/survey/results", get(handlers::survey::get_results));

    router
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(allowed_origins))
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), StartupError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);
    info!("- Pins endpoint: http://{}/pins/", addr);
    info!("- Survey endpoint: http://{}/survey/", addr);
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
