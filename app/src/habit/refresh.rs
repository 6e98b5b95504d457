use derive_more::derive::{Display, Error};
use infrastructure::meter;

use crate::core::time::Date;
use crate::port::{KeyValueStore, RemoteFetchError, StatusSource};
use crate::t;

use super::{CacheBlob, HabitCache, HabitDefinition, HabitId, HabitSnapshot, UNKNOWN_HABIT_NAME, habit_name};

#[derive(Debug, Display, Error)]
pub enum RefreshError {
    #[display("Error fetching habit definitions")]
    Definitions(RemoteFetchError),

    #[display("Error writing refreshed cache: {_0:#}")]
    Store(#[error(not(source))] anyhow::Error),
}

/// Rebuilds the whole cache from the upstream API.
#[derive(Debug, Clone)]
pub struct CacheRefreshJob<C, S> {
    source: C,
    cache: HabitCache<S>,
    tracked: Vec<HabitId>,
}

impl<C, S> CacheRefreshJob<C, S>
where
    C: StatusSource,
    S: KeyValueStore,
{
    pub fn new(source: C, cache: HabitCache<S>, tracked: Vec<HabitId>) -> Self {
        Self { source, cache, tracked }
    }

    /// Fetches `days` days of history for every tracked habit and replaces the cached blob.
    ///
    /// Only a failing definition fetch or a failing cache write aborts; single dates that
    /// cannot be fetched are left out of the snapshot.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self, days: i64) -> Result<CacheBlob, RefreshError> {
        let habits = self.source.fetch_habits().await.map_err(RefreshError::Definitions)?;
        let tracked = super::tracked_habits(&self.tracked, habits.iter().map(|h| h.id.clone()));
        let today = t!(today);

        tracing::info!("Refreshing {} days for {} habits", days, tracked.len());

        let habits_data = futures::future::join_all(
            tracked
                .iter()
                .map(|habit_id| self.fetch_snapshot(habit_id, &habits, today, days)),
        )
        .await;

        let blob = CacheBlob {
            habits,
            habits_data,
            last_updated: t!(now),
        };

        self.cache.store(&blob).await.map_err(RefreshError::Store)?;

        tracing::info!(
            "Cache refreshed with {} records for {} habits",
            blob.total_records(),
            blob.habits_data.len()
        );

        Ok(blob)
    }

    //dates of one habit are fetched one after another, oldest first
    async fn fetch_snapshot(
        &self,
        habit_id: &HabitId,
        habits: &[HabitDefinition],
        today: Date,
        days: i64,
    ) -> HabitSnapshot {
        let name = habit_name(habits, habit_id).unwrap_or_else(|| UNKNOWN_HABIT_NAME.to_owned());
        tracing::debug!("Fetching {} days of {} ({})", days, name, habit_id);

        let mut statuses = Vec::new();
        for date in today.window_ending_here(days) {
            match self.source.fetch_status(habit_id, date).await {
                Ok(record) => statuses.push(record),
                Err(e) => {
                    tracing::warn!("Skipping {} of habit {}: {}", date, habit_id, e);
                    meter::increment("habitify_fetch_failed", &[("operation", "refresh")]);
                }
            }
        }

        HabitSnapshot {
            id: habit_id.clone(),
            name,
            statuses,
        }
    }
}
