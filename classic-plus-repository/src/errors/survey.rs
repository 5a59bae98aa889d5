use thiserror::Error;

#[derive(Debug, Error)]
/// Represents errors that can occur within the survey repository.
pub enum SurveyRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
