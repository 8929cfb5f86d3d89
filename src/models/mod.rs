pub mod outcome;
pub mod submission;

pub use outcome::{FailureReason, Outcome, RejectReason};
pub use submission::SubmissionRecord;
