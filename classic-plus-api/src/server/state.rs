// App state for Axum server
use std::sync::Arc;

use classic_plus_repository::{PinsRepository, SchemaManager, SurveyRepository};
use classic_plus_shared::types::SurveyDefinition;

use crate::config::Secret;
use crate::identity::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub pins: Arc<dyn PinsRepository>,
    pub surveys: Arc<dyn SurveyRepository>,
    pub schema: Arc<dyn SchemaManager>,
    /// `None` when no identity provider is configured.
    pub identity_verifier: Option<Arc<dyn IdentityVerifier>>,
    pub survey_definition: Arc<SurveyDefinition>,
    /// `None` disables the admin endpoints.
    pub admin_token: Option<Secret>,
    pub trust_forwarded_for: bool,
}
