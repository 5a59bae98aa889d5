//! Dependency initialization and wiring for the API service.

use std::sync::Arc;

use classic_plus_repository::{
    InMemoryStore, PostgresPinsRepository, PostgresSchemaManager, PostgresSurveyRepository,
    SchemaManager,
};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use super::{Settings, StorageBackend};
use crate::errors::StartupError;
use crate::identity::{DiscordVerifier, IdentityVerifier};
use crate::server::state::AppState;
use crate::survey::load_definition;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The application state ready to be handed to the router.
    pub state: AppState,
}

impl Dependencies {
    /// Initialize all dependencies from the parsed settings.
    ///
    /// Connects to the configured store and brings its schema up to date,
    /// builds the identity verifier when Discord is configured and loads the
    /// survey definition.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(StartupError)` - If the store, schema or survey definition cannot be set up
    pub async fn new(settings: &Settings) -> Result<Self, StartupError> {
        let storage = match settings.storage {
            StorageBackend::Postgres { .. } => "postgres",
            StorageBackend::Memory => "memory",
        };
        info!(
            storage,
            trust_forwarded_for = settings.trust_forwarded_for,
            admin_enabled = settings.admin_token.is_some(),
            discord_enabled = settings.discord.is_some(),
            "Initializing dependencies"
        );

        let survey_definition = Arc::new(load_definition(settings.survey_definition_path.as_deref())?);

        let identity_verifier: Option<Arc<dyn IdentityVerifier>> = match &settings.discord {
            Some(discord) => {
                let verifier = DiscordVerifier::new(discord.clone()).map_err(|e| {
                    StartupError::config(format!("Failed to create Discord client: {}", e))
                })?;
                Some(Arc::new(verifier) as Arc<dyn IdentityVerifier>)
            }
            None => {
                warn!("Discord is not configured, the auth callback will answer 503");
                None
            }
        };

        let state = match &settings.storage {
            StorageBackend::Postgres {
                database_url,
                max_connections,
            } => {
                let pool = PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .connect(database_url.expose())
                    .await?;
                info!(max_connections, "PostgreSQL pool connected");

                let schema = PostgresSchemaManager::new(pool.clone());
                schema.migrate().await?;

                AppState {
                    pins: Arc::new(PostgresPinsRepository::new(pool.clone()).await.map_err(|e| {
                        StartupError::config(format!("Failed to create pins repository: {}", e))
                    })?),
                    surveys: Arc::new(PostgresSurveyRepository::new(pool).await.map_err(|e| {
                        StartupError::config(format!("Failed to create survey repository: {}", e))
                    })?),
                    schema: Arc::new(schema),
                    identity_verifier,
                    survey_definition,
                    admin_token: settings.admin_token.clone(),
                    trust_forwarded_for: settings.trust_forwarded_for,
                }
            }
            StorageBackend::Memory => {
                warn!("Using the in-memory store, all data is lost on restart");
                let store = Arc::new(InMemoryStore::new());
                AppState {
                    pins: store.clone(),
                    surveys: store.clone(),
                    schema: store,
                    identity_verifier,
                    survey_definition,
                    admin_token: settings.admin_token.clone(),
                    trust_forwarded_for: settings.trust_forwarded_for,
                }
            }
        };

        Ok(Self { state })
    }
}
