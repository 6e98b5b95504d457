use moka::future::Cache;

use crate::core::time::Duration;
use crate::port::KeyValueStore;

//Entries expire after the configured lifetime, so a stale cache turns into "no cache"
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Cache<String, String>,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().max_capacity(64).time_to_live(ttl.to_std()).build(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.entries.insert(key.to_owned(), value).await;
        Ok(())
    }

    fn storage_name(&self) -> &'static str {
        "In-Memory"
    }
}
