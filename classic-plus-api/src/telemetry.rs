//! Tracing setup for the API binaries.

use std::env;

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::StartupError;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "classic_plus_api=info,classic_plus_repository=info,tower_http=info";

/// Initialize tracing/logging.
///
/// `LOG_FORMAT=json` switches to JSON lines for log shippers; otherwise the
/// output is a pretty console format.
pub fn init_tracing() -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| StartupError::config(format!("Failed to initialize tracing: {}", e)))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| StartupError::config(format!("Failed to initialize tracing: {}", e)))?;
    }

    info!(
        service_name = "classic-plus-api",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
    Ok(())
}
