//! Classic Plus API entry point.
//!
//! Loads settings from the environment (and `.env`), migrates the store and
//! serves the HTTP API until Ctrl-C.

use classic_plus_api::{Dependencies, Settings, StartupError, server, telemetry::init_tracing};
use dotenv::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting Classic Plus API");

    let settings = Settings::from_env().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    let deps = match Dependencies::new(&settings).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = server::create_app(deps.state, settings.cors_allowed_origins.clone());
    match server::run_server(app, settings.socket_addr()).await {
        Ok(()) => {
            info!("Server stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            Err(e)
        }
    }
}
