use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::SurveyResponses;

/// How many times each distinct answer was given to one question.
pub type AnswerCounts = BTreeMap<String, u64>;

/// Aggregated survey results: question key to answer counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyResults(BTreeMap<String, AnswerCounts>);

impl SurveyResults {
    /// Counts every answer of every submission.
    ///
    /// List answers count each element once. A `null` answer to a question
    /// is skipped, while a `null` inside a list answer is counted as `"null"`.
    /// Other non-string scalars are counted under their JSON text.
    pub fn aggregate<'a, I>(submissions: I) -> Self
    where
        I: IntoIterator<Item = &'a SurveyResponses>,
    {
        let mut results = BTreeMap::<String, AnswerCounts>::new();
        for responses in submissions {
            for (key, value) in responses {
                let answers: Box<dyn Iterator<Item = &Value>> = match value {
                    Value::Null => continue,
                    Value::Array(items) => Box::new(items.iter()),
                    single => Box::new(std::iter::once(single)),
                };
                for answer in answers.map(answer_label) {
                    *results
                        .entry(key.clone())
                        .or_default()
                        .entry(answer)
                        .or_default() += 1;
                }
            }
        }
        SurveyResults(results)
    }

    pub fn question(&self, key: &str) -> Option<&AnswerCounts> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn answer_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
