use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, LanguageModelService};

/// Explicitly constructed dependencies for one surface (server or CLI).
/// Every collaborator is injected, so tests swap in fakes freely.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub language_model: Arc<dyn LanguageModelService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        issue_tracker: Arc<dyn IssueTrackerService>,
        language_model: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self {
            config,
            issue_tracker,
            language_model,
        }
    }
}
