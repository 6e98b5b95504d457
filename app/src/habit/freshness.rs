use crate::core::time::DateTime;
use crate::port::KeyValueStore;
use crate::t;

use super::HabitCache;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheState {
    pub cached: bool,
    pub last_updated: Option<DateTime>,
    pub age_minutes: Option<i64>,
    pub habits_count: usize,
    pub habits_data_count: usize,
    pub total_statuses: usize,
}

/// Read-only diagnostic of what the cache currently holds.
pub async fn describe_cache_state<S: KeyValueStore>(cache: &HabitCache<S>) -> anyhow::Result<CacheState> {
    let last_updated = cache.last_updated().await?;
    let habits = cache.habits().await?.unwrap_or_default();
    let habits_data = cache.habits_data().await?.unwrap_or_default();

    Ok(CacheState {
        cached: !habits.is_empty() && !habits_data.is_empty(),
        last_updated,
        age_minutes: last_updated.map(|ts| t!(now).elapsed_since(ts).as_minutes()),
        habits_count: habits.len(),
        habits_data_count: habits_data.len(),
        total_statuses: habits_data.iter().map(|h| h.statuses.len()).sum(),
    })
}
