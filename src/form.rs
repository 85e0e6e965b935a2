//! Caller-side validation for the job creation form.
//!
//! Nothing here reaches the store: a form that fails validation is reported
//! back field by field and never submitted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::jobs::{CreateJobRequest, JobPriority, Payload};

pub const TASK_NAME_REQUIRED: &str = "Task name is required";
pub const PAYLOAD_INVALID_JSON: &str = "Payload must be valid JSON";
pub const PAYLOAD_NOT_OBJECT: &str = "Payload must be a JSON object";

/// Raw fields as submitted by the creation form.
///
/// `payload` is either the JSON text typed into the form or an already
/// structured value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobForm {
    #[serde(default)]
    pub task_name: String,
    #[serde(default = "empty_payload")]
    pub payload: Value,
    #[serde(default)]
    pub priority: JobPriority,
}

fn empty_payload() -> Value {
    Value::Object(Payload::new())
}

/// Field-level validation failures, all collected in one pass.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("invalid job form")]
pub struct ValidationErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.task_name.is_none() && self.payload.is_none()
    }
}

impl CreateJobForm {
    pub fn new(task_name: impl Into<String>, payload_text: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            payload: Value::String(payload_text.into()),
            priority: JobPriority::default(),
        }
    }

    pub fn with_priority(mut self, priority: JobPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn validate(&self) -> Result<CreateJobRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let task_name = self.task_name.trim();
        if task_name.is_empty() {
            errors.task_name = Some(TASK_NAME_REQUIRED.to_string());
        }

        let payload = match parse_payload(&self.payload) {
            Ok(payload) => Some(payload),
            Err(message) => {
                errors.payload = Some(message.to_string());
                None
            }
        };

        match payload {
            Some(payload) if errors.is_empty() => Ok(CreateJobRequest {
                task_name: task_name.to_string(),
                payload,
                priority: self.priority,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_payload(raw: &Value) -> Result<Payload, &'static str> {
    let value = match raw {
        Value::String(text) => {
            serde_json::from_str::<Value>(text).map_err(|_| PAYLOAD_INVALID_JSON)?
        }
        other => other.clone(),
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PAYLOAD_NOT_OBJECT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_form_produces_request() {
        let form = CreateJobForm::new("  Backup  ", r#"{"databases": ["main"]}"#)
            .with_priority(JobPriority::High);
        let request = form.validate().unwrap();
        assert_eq!(request.task_name, "Backup");
        assert_eq!(request.priority, JobPriority::High);
        assert_eq!(request.payload["databases"], json!(["main"]));
    }

    #[test]
    fn blank_task_name_is_rejected() {
        let errors = CreateJobForm::new("   ", "{}").validate().unwrap_err();
        assert_eq!(errors.task_name.as_deref(), Some(TASK_NAME_REQUIRED));
        assert!(errors.payload.is_none());
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let errors = CreateJobForm::new("Backup", "{not json").validate().unwrap_err();
        assert_eq!(errors.payload.as_deref(), Some(PAYLOAD_INVALID_JSON));
        assert!(errors.task_name.is_none());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let errors = CreateJobForm::new("Backup", "[1, 2, 3]").validate().unwrap_err();
        assert_eq!(errors.payload.as_deref(), Some(PAYLOAD_NOT_OBJECT));
    }

    #[test]
    fn all_field_errors_are_reported_together() {
        let errors = CreateJobForm::new("", "oops").validate().unwrap_err();
        assert!(errors.task_name.is_some());
        assert!(errors.payload.is_some());
        assert!(!errors.is_empty());
    }

    #[test]
    fn form_deserializes_with_defaults() {
        let form: CreateJobForm = serde_json::from_value(json!({"taskName": "Sync"})).unwrap();
        assert_eq!(form.priority, JobPriority::Medium);
        let request = form.validate().unwrap();
        assert!(request.payload.is_empty());
    }

    #[test]
    fn structured_payload_is_accepted_as_is() {
        let form: CreateJobForm = serde_json::from_value(json!({
            "taskName": "Sync",
            "payload": {"batchSize": 1000},
            "priority": "low"
        }))
        .unwrap();
        let request = form.validate().unwrap();
        assert_eq!(request.payload["batchSize"], 1000);
        assert_eq!(request.priority, JobPriority::Low);
    }

    #[test]
    fn errors_serialize_only_failed_fields() {
        let errors = CreateJobForm::new("", "{}").validate().unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, json!({"taskName": TASK_NAME_REQUIRED}));
    }
}
