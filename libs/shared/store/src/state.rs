use shared_config::AppConfig;

use crate::json_store::JsonStore;

/// Shared application state handed to every router.
pub struct AppState {
    pub config: AppConfig,
    pub store: JsonStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = JsonStore::new(config.data_dir.clone());
        Self { config, store }
    }
}
