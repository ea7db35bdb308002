use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{pg::PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = PgStore::connect(&config.database_url).await?;
        store.run_migrations().await;
        Ok(Self {
            store: Arc::new(store),
            config,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        use crate::config::JwtConfig;
        use crate::store::memory::MemoryStore;

        let config = Arc::new(AppConfig {
            database_url: "postgres://unused".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 15,
            },
        });
        Self {
            store: Arc::new(MemoryStore::new()),
            config,
        }
    }
}
