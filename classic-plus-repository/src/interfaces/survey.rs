use classic_plus_shared::types::{SurveyEntry, SurveyResponses};

use crate::errors::SurveyRepositoryError;

/// Trait for interacting with the survey entry repository.
///
/// Each identity owns at most one entry; submitting again replaces its responses.
#[async_trait::async_trait]
pub trait SurveyRepository: Send + Sync {
    async fn upsert_entry(
        &self,
        identity: &str,
        responses: &SurveyResponses,
    ) -> Result<SurveyEntry, SurveyRepositoryError>;
    async fn get_entry(&self, identity: &str) -> Result<Option<SurveyEntry>, SurveyRepositoryError>;
    async fn list_entries(&self) -> Result<Vec<SurveyEntry>, SurveyRepositoryError>;
}
