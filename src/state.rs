use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::uploads::disk::DiskStore;
use crate::users::store::{MemoryStore, MongoStore, UserStore};

/// Shared per-request context, built once at startup and injected into
/// every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub uploads: Arc<DiskStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env());

        let store = MongoStore::connect(&config.mongodb_url, &config.mongodb_db)
            .await
            .context("open MongoDB client")?;

        let uploads = DiskStore::open(&config.upload_dir)?;

        Ok(Self {
            store: Arc::new(store),
            uploads: Arc::new(uploads),
            config,
        })
    }

    pub fn from_parts(
        store: Arc<dyn UserStore>,
        uploads: Arc<DiskStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            uploads,
            config,
        }
    }

    /// State over the in-memory store and the given upload directory. The
    /// test suites build their routers on top of this; no database needed.
    pub fn in_memory(upload_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let upload_dir = upload_dir.into();
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            mongodb_url: "mongodb://127.0.0.1:27017".into(),
            mongodb_db: "register".into(),
            upload_dir: upload_dir.clone(),
        });

        let uploads = DiskStore::open(upload_dir)?;

        Ok(Self {
            store: Arc::new(MemoryStore::new()),
            uploads: Arc::new(uploads),
            config,
        })
    }
}
