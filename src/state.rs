use std::sync::Arc;

use crate::config::Config;
use crate::submission::SubmissionStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub submissions: SubmissionStore,
}
