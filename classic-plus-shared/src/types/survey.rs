use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Answers of one survey submission, keyed by question key.
///
/// Values are strings for text and radio questions, lists of strings for
/// checkbox questions, and `null` for unanswered questions.
pub type SurveyResponses = serde_json::Map<String, serde_json::Value>;

/// The stored survey submission of one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyEntry {
    pub id: i64,
    #[serde(rename = "discord_username")]
    pub identity: String,
    pub responses: SurveyResponses,
    pub updated_at: DateTime<Utc>,
}

/// Describes the survey so that a client can render it dynamically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyDefinition {
    pub sections: Vec<SurveySection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySection {
    pub title: String,
    #[serde(default)]
    pub locked: bool,
    pub questions: Vec<SurveyQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Checkbox,
    Radio,
}

impl SurveyDefinition {
    /// Iterates over every question of every section, in order.
    pub fn questions(&self) -> impl Iterator<Item = &SurveyQuestion> {
        self.sections.iter().flat_map(|section| section.questions.iter())
    }
}
