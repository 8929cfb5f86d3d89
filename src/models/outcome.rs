#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// An object already exists for this email.
    DuplicateKey,
    /// The email cannot form a storage key.
    InvalidEmail,
    /// The request body could not be read.
    MalformedRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    CheckError,
    WriteError,
    UrlError,
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Rejected {
        reason: RejectReason,
        message: String,
    },
    Stored {
        read_url: Option<String>,
        message: String,
    },
    Failed {
        reason: FailureReason,
        message: String,
    },
}

impl Outcome {
    pub fn duplicate(email: &str) -> Self {
        Outcome::Rejected {
            reason: RejectReason::DuplicateKey,
            message: format!("The email address {email} has already been used."),
        }
    }

    pub fn invalid_email(detail: impl std::fmt::Display) -> Self {
        Outcome::Rejected {
            reason: RejectReason::InvalidEmail,
            message: format!("The submission could not be accepted: {detail}."),
        }
    }

    pub fn malformed(detail: impl std::fmt::Display) -> Self {
        Outcome::Rejected {
            reason: RejectReason::MalformedRequest,
            message: format!("The submission could not be read: {detail}."),
        }
    }

    pub fn check_failed(email: &str) -> Self {
        Outcome::Failed {
            reason: FailureReason::CheckError,
            message: format!("An error occurred while checking whether {email} was already used."),
        }
    }

    pub fn write_failed() -> Self {
        Outcome::Failed {
            reason: FailureReason::WriteError,
            message: "The submission could not be stored.".to_string(),
        }
    }

    pub fn stored(read_url: String) -> Self {
        Outcome::Stored {
            read_url: Some(read_url),
            message: "The submission was stored successfully.".to_string(),
        }
    }

    pub fn stored_without_link() -> Self {
        Outcome::Stored {
            read_url: None,
            message: "The submission was stored, but no public link is available.".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Stored { .. })
    }

    pub fn read_url(&self) -> Option<&str> {
        match self {
            Outcome::Stored { read_url, .. } => read_url.as_deref(),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Rejected { message, .. }
            | Outcome::Stored { message, .. }
            | Outcome::Failed { message, .. } => message,
        }
    }
}
