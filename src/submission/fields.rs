use serde_json::Value;

use crate::models::SubmissionRecord;

use super::metadata::ClientMetadata;

/// Form fields the service reads. Everything else in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl SubmissionForm {
    /// Pick `firstName`, `lastName` and `email` out of a parsed body.
    /// Missing or non-string values are treated as absent.
    pub fn from_value(raw: &Value) -> Self {
        let text = |name: &str| raw.get(name).and_then(Value::as_str).map(str::to_string);

        Self {
            first_name: text("firstName"),
            last_name: text("lastName"),
            email: text("email"),
        }
    }

    pub fn into_record(self, meta: ClientMetadata) -> SubmissionRecord {
        SubmissionRecord {
            first_name: self.first_name,
            last_name: self.last_name,
            email_address: self.email.unwrap_or_default(),
            user_agent: meta.user_agent,
            ip_address: meta.ip_address,
        }
    }
}
