pub mod fields;
pub mod key;
pub mod metadata;
pub mod parser;
pub mod pipeline;
pub mod redirect;

pub use key::{KeyMode, StorageKey};
pub use pipeline::SubmissionStore;
