//! The survey definition served to clients.
//!
//! A built-in definition is compiled into the binary. Deployments can replace
//! it with a JSON file of the same shape via `SURVEY_DEFINITION_PATH`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use classic_plus_shared::types::{QuestionKind, SurveyDefinition};
use tracing::info;

use crate::errors::StartupError;

const BUILTIN_DEFINITION: &str = include_str!("definition.json");

/// Loads the survey definition from `path`, or the built-in one when `None`.
pub fn load_definition(path: Option<&Path>) -> Result<SurveyDefinition, StartupError> {
    let definition = match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| {
                StartupError::config(format!(
                    "Failed to read survey definition {}: {}",
                    path.display(),
                    e
                ))
            })?;
            parse_definition(&raw)?
        }
        None => parse_definition(BUILTIN_DEFINITION)?,
    };

    info!(
        sections = definition.sections.len(),
        questions = definition.questions().count(),
        custom = path.is_some(),
        "Survey definition loaded"
    );
    Ok(definition)
}

fn parse_definition(raw: &str) -> Result<SurveyDefinition, StartupError> {
    let definition: SurveyDefinition = serde_json::from_str(raw)
        .map_err(|e| StartupError::config(format!("Invalid survey definition: {}", e)))?;

    let mut keys = HashSet::new();
    for question in definition.questions() {
        if !keys.insert(question.key.as_str()) {
            return Err(StartupError::config(format!(
                "Duplicate survey question key: {}",
                question.key
            )));
        }
        let needs_options = matches!(question.kind, QuestionKind::Checkbox | QuestionKind::Radio);
        if needs_options && question.options.as_ref().is_none_or(Vec::is_empty) {
            return Err(StartupError::config(format!(
                "Survey question '{}' needs at least one option",
                question.key
            )));
        }
    }

    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("classic-plus-{}-{}.json", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_builtin_definition() {
        let definition = load_definition(None).unwrap();

        let titles: Vec<_> = definition.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["General Questions", "Player Questions", "Systems Questions", "World Questions"]
        );
        assert!(!definition.sections[0].locked);
        assert!(definition.sections[1..].iter().all(|section| section.locked));
        assert_eq!(definition.questions().count(), 7);

        let versions = definition
            .questions()
            .find(|question| question.key == "previous_versions")
            .unwrap();
        assert_eq!(versions.kind, QuestionKind::Checkbox);
        assert_eq!(versions.options.as_ref().unwrap().len(), 8);
    }

    #[test]
    fn test_definition_serializes_type_field() {
        let definition = load_definition(None).unwrap();
        let json = serde_json::to_value(&definition).unwrap();

        let first = &json["sections"][0]["questions"][0];
        assert_eq!(first["type"], "text");
        assert!(first.get("options").is_none());
        assert_eq!(first["required"], true);
    }

    #[test]
    fn test_custom_definition_file() {
        let path = write_temp(
            "custom",
            r#"{"sections": [{"title": "Only", "questions": [
                {"key": "faction", "label": "Faction?", "type": "radio", "options": ["Horde", "Alliance"]}
            ]}]}"#,
        );

        let definition = load_definition(Some(&path)).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(definition.sections.len(), 1);
        assert!(!definition.sections[0].locked);
        assert!(!definition.sections[0].questions[0].required);
    }

    #[test]
    fn test_rejects_malformed_definitions() {
        let malformed = write_temp("malformed", "{\"sections\": [");
        let duplicate = write_temp(
            "duplicate",
            r#"{"sections": [{"title": "A", "questions": [
                {"key": "name", "label": "Name", "type": "text"},
                {"key": "name", "label": "Name again", "type": "text"}
            ]}]}"#,
        );
        let optionless = write_temp(
            "optionless",
            r#"{"sections": [{"title": "A", "questions": [
                {"key": "pick", "label": "Pick one", "type": "radio"}
            ]}]}"#,
        );

        for path in [&malformed, &duplicate, &optionless] {
            let result = load_definition(Some(path));
            fs::remove_file(path).ok();
            assert!(matches!(result, Err(StartupError::ConfigError(_))));
        }
    }

    #[test]
    fn test_missing_definition_file() {
        let result = load_definition(Some(Path::new("/nonexistent/classic-plus-survey.json")));
        assert!(matches!(result, Err(StartupError::ConfigError(_))));
    }
}
