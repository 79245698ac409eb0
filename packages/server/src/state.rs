use std::sync::Arc;

use common::storage::ObjectStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::imports::{ContentIngestor, OperationRegistry};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub registry: OperationRegistry,
    pub ingestor: ContentIngestor,
}

impl AppState {
    /// Wire the import services onto a shared connection pool and object store.
    pub fn new(db: DatabaseConnection, config: AppConfig, store: Arc<dyn ObjectStore>) -> Self {
        let registry = OperationRegistry::new(db.clone(), config.imports.operation_ttl());
        let ingestor = ContentIngestor::new(
            db,
            store,
            registry.clone(),
            config.imports.max_upload_size,
        );

        Self {
            config,
            registry,
            ingestor,
        }
    }
}
