use crate::storage::{PathResolver, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<crate::config::Config>,
    pub storage: Arc<Storage>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: crate::config::Config) -> Self {
        let storage = Storage::new(PathResolver::new(config.storage_root.clone()));

        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            start_time: std::time::Instant::now(),
        }
    }
}
