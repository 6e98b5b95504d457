use anyhow::Context as _;
use serde::{Serialize, de::DeserializeOwned};

use crate::core::time::DateTime;
use crate::port::KeyValueStore;

use super::{CacheBlob, HabitDefinition, HabitSnapshot};

const HABITS_KEY: &str = "habits";
const HABITS_DATA_KEY: &str = "habitsData";
const LAST_UPDATED_KEY: &str = "lastUpdated";

/// Typed view on the three cache entries. Each entry is read independently, a blob is
/// only ever written as a whole.
#[derive(Debug, Clone)]
pub struct HabitCache<S> {
    store: S,
}

impl<S: KeyValueStore> HabitCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn storage_name(&self) -> &'static str {
        self.store.storage_name()
    }

    pub async fn habits(&self) -> anyhow::Result<Option<Vec<HabitDefinition>>> {
        self.get_json(HABITS_KEY).await
    }

    pub async fn habits_data(&self) -> anyhow::Result<Option<Vec<HabitSnapshot>>> {
        self.get_json(HABITS_DATA_KEY).await
    }

    pub async fn last_updated(&self) -> anyhow::Result<Option<DateTime>> {
        match self.store.get(LAST_UPDATED_KEY).await? {
            Some(raw) => DateTime::from_iso(raw.trim_matches('"'))
                .map(Some)
                .with_context(|| format!("Error parsing cached {} value {}", LAST_UPDATED_KEY, raw)),
            None => Ok(None),
        }
    }

    //Entries are written one by one without a transaction. A failed write can leave new
    //definitions next to older snapshots; the timestamp goes last, so such a blob keeps its
    //previous lastUpdated and the next refresh replaces it.
    pub async fn store(&self, blob: &CacheBlob) -> anyhow::Result<()> {
        self.set_json(HABITS_KEY, &blob.habits).await?;
        self.set_json(HABITS_DATA_KEY, &blob.habits_data).await?;
        self.store
            .set(LAST_UPDATED_KEY, blob.last_updated.to_iso_string())
            .await
            .with_context(|| format!("Error writing cache entry {}", LAST_UPDATED_KEY))
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .with_context(|| format!("Error parsing cache entry {}", key))
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store
            .set(key, raw)
            .await
            .with_context(|| format!("Error writing cache entry {}", key))
    }
}
