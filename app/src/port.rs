#![allow(async_fn_in_trait)]

use derive_more::derive::{Display, Error};

use crate::core::time::Date;
use crate::habit::{HabitDefinition, HabitId, StatusRecord};

/// Upstream source of habit definitions and daily status records.
pub trait StatusSource {
    async fn fetch_habits(&self) -> Result<Vec<HabitDefinition>, RemoteFetchError>;

    /// The returned record is always dated `date`, whatever the upstream payload says.
    async fn fetch_status(&self, habit_id: &HabitId, date: Date) -> Result<StatusRecord, RemoteFetchError>;
}

/// Plain string key-value storage backing the habit cache.
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()>;

    fn storage_name(&self) -> &'static str;
}

#[derive(Debug, Display, Error)]
pub enum RemoteFetchError {
    #[display("Error fetching habit definitions: {cause:#}")]
    Habits { cause: anyhow::Error },

    #[display("Error fetching status of habit {habit_id} for {date}: {cause:#}")]
    Status {
        habit_id: HabitId,
        date: Date,
        cause: anyhow::Error,
    },
}
