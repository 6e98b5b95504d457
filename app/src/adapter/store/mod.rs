mod file;
mod memory;
mod upstash;

use std::path::PathBuf;

use serde::Deserialize;

use crate::core::time::Duration;
use crate::port::KeyValueStore;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use upstash::UpstashStore;

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum CacheSettings {
    Memory {
        #[serde(default = "default_ttl_hours")]
        ttl_hours: i64,
    },
    File {
        dir: PathBuf,
    },
    Upstash {
        url: String,
        token: String,
        #[serde(default = "default_ttl_hours")]
        ttl_hours: i64,
    },
}

fn default_ttl_hours() -> i64 {
    24
}

impl CacheSettings {
    pub fn new_store(&self) -> anyhow::Result<CacheStore> {
        let store = match self {
            CacheSettings::Memory { ttl_hours } => CacheStore::Memory(MemoryStore::new(Duration::hours(*ttl_hours))),
            CacheSettings::File { dir } => CacheStore::File(FileStore::new(dir.clone())),
            CacheSettings::Upstash { url, token, ttl_hours } => {
                CacheStore::Upstash(UpstashStore::new(url, token, Duration::hours(*ttl_hours))?)
            }
        };

        Ok(store)
    }

    /// Nominal freshness as shown in diagnostics.
    pub fn ttl_description(&self) -> String {
        match self {
            CacheSettings::Memory { ttl_hours } | CacheSettings::Upstash { ttl_hours, .. } => {
                format!("{} hours", ttl_hours)
            }
            CacheSettings::File { .. } => "none".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CacheStore {
    Memory(MemoryStore),
    File(FileStore),
    Upstash(UpstashStore),
}

impl KeyValueStore for CacheStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        match self {
            CacheStore::Memory(store) => store.get(key).await,
            CacheStore::File(store) => store.get(key).await,
            CacheStore::Upstash(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        match self {
            CacheStore::Memory(store) => store.set(key, value).await,
            CacheStore::File(store) => store.set(key, value).await,
            CacheStore::Upstash(store) => store.set(key, value).await,
        }
    }

    fn storage_name(&self) -> &'static str {
        match self {
            CacheStore::Memory(store) => store.storage_name(),
            CacheStore::File(store) => store.storage_name(),
            CacheStore::Upstash(store) => store.storage_name(),
        }
    }
}
