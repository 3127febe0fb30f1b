use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{ListCache, TokenService};

/// Process-wide application context handed to request handlers. Holds the
/// lazily-initialized store connection and the list cache explicitly, so
/// their lifecycle is the process lifecycle and there is no ambient global
/// state.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub tokens: Arc<TokenService>,

    pub pr_cache: Arc<ListCache>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let tokens = Arc::new(TokenService::new(&config.auth));
        let pr_cache = Arc::new(ListCache::new(Duration::from_secs(
            config.general.list_cache_ttl_seconds,
        )));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            tokens,
            pr_cache,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
