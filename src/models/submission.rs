use serde::Serialize;

/// The object persisted for each accepted submission.
///
/// Optional fields serialize as `null` so every stored object has the same
/// five keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl SubmissionRecord {
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
