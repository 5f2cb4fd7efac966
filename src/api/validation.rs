//! Request body validation for `POST /api/tasks` and `PUT /api/tasks/{id}`.
//!
//! Works on raw JSON so that every broken field is reported at once, instead
//! of stopping at the first one as a typed deserializer would.

use crate::libs::error::FieldError;
use crate::libs::task::{parse_deadline, Task};
use serde_json::{Map, Value};

pub const MIN_DESCRIPTION_LEN: usize = 5;

/// Checks a task body and builds the [`Task`] it describes. Flags that are
/// absent take their defaults; `id` in the body is ignored.
pub fn validate_task(body: &Value) -> Result<Task, Vec<FieldError>> {
    let Some(fields) = body.as_object() else {
        return Err(vec![FieldError::new("body", "Must be a JSON object")]);
    };
    let mut errors = Vec::new();

    let description = match fields.get("description") {
        Some(Value::String(text)) if text.chars().count() >= MIN_DESCRIPTION_LEN => Some(text.clone()),
        _ => {
            errors.push(FieldError::new(
                "description",
                format!("Must be a string of at least {} characters", MIN_DESCRIPTION_LEN),
            ));
            None
        }
    };
    let private_task = flag(fields, "privateTask", true, &mut errors);
    let important = flag(fields, "important", false, &mut errors);
    let completed = flag(fields, "completed", false, &mut errors);
    let project = text(fields, "project", &mut errors);
    let deadline = text(fields, "deadline", &mut errors).and_then(|raw| {
        let parsed = parse_deadline(&raw);
        if parsed.is_none() {
            errors.push(FieldError::new("deadline", "Must be a date or timestamp"));
        }
        parsed
    });

    match description {
        Some(description) if errors.is_empty() => Ok(Task {
            id: None,
            description,
            private_task,
            important,
            project,
            deadline,
            completed,
        }),
        _ => Err(errors),
    }
}

fn flag(fields: &Map<String, Value>, name: &str, default: bool, errors: &mut Vec<FieldError>) -> bool {
    match fields.get(name) {
        None | Some(Value::Null) => default,
        Some(Value::Bool(value)) => *value,
        Some(_) => {
            errors.push(FieldError::new(name, "Must be a boolean"));
            default
        }
    }
}

/// Optional text field. Absent and `null` mean "none"; an empty string is
/// rejected rather than read as "none".
fn text(fields: &Map<String, Value>, name: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    match fields.get(name) {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) if !value.trim().is_empty() => Some(value.clone()),
        Some(Value::String(_)) => {
            errors.push(FieldError::new(name, "Must not be empty when present"));
            None
        }
        Some(_) => {
            errors.push(FieldError::new(name, "Must be a string"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn params(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.param.as_str()).collect()
    }

    #[test]
    fn accepts_a_minimal_body_with_defaults() {
        let task = validate_task(&json!({"description": "Buy milk"})).unwrap();
        assert_eq!(task, Task::new("Buy milk"));
    }

    #[test]
    fn accepts_a_full_body() {
        let task = validate_task(&json!({
            "id": 42,
            "description": "Submit report",
            "privateTask": false,
            "important": true,
            "project": "Work",
            "deadline": "2026-10-23T17:00:00Z",
            "completed": true
        }))
        .unwrap();
        assert_eq!(task.id, None);
        assert!(!task.private_task);
        assert!(task.important);
        assert!(task.completed);
        assert_eq!(task.project.as_deref(), Some("Work"));
        assert_eq!(task.deadline, Some(Utc.with_ymd_and_hms(2026, 10, 23, 17, 0, 0).unwrap()));
    }

    #[test]
    fn reports_every_broken_field() {
        let errors = validate_task(&json!({
            "description": "Hi",
            "privateTask": "yes",
            "important": 1,
            "project": "",
            "deadline": "soon",
            "completed": null
        }))
        .unwrap_err();
        assert_eq!(params(&errors), vec!["description", "privateTask", "important", "project", "deadline"]);
    }

    #[test]
    fn missing_description_is_an_error() {
        let errors = validate_task(&json!({"important": true})).unwrap_err();
        assert_eq!(params(&errors), vec!["description"]);
    }

    #[test]
    fn empty_deadline_is_rejected() {
        let errors = validate_task(&json!({"description": "Buy milk", "deadline": ""})).unwrap_err();
        assert_eq!(params(&errors), vec!["deadline"]);
    }

    #[test]
    fn deadline_beyond_year_9999_is_rejected() {
        let errors = validate_task(&json!({"description": "Far future", "deadline": "+10000-01-01"})).unwrap_err();
        assert_eq!(params(&errors), vec!["deadline"]);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = validate_task(&json!(["Buy milk"])).unwrap_err();
        assert_eq!(params(&errors), vec!["body"]);
    }

    #[test]
    fn description_length_counts_characters() {
        assert!(validate_task(&json!({"description": "Café!"})).is_ok());
        assert!(validate_task(&json!({"description": "Café"})).is_err());
    }
}
