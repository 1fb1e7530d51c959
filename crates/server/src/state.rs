use std::sync::Arc;

use rulegen_engine::RuleService;
use rulegen_store::{RuleStore, TemplateProvider};

pub struct AppState {
    pub templates: Arc<dyn TemplateProvider>,
    pub rules: Arc<dyn RuleStore>,
    pub service: RuleService,
}
