use derive_more::derive::{Display, Error};
use infrastructure::meter;

use crate::core::time::Date;
use crate::port::{KeyValueStore, StatusSource};
use crate::t;

use super::{
    HabitCache, HabitDefinition, HabitId, HabitSnapshot, StatusRecord, UNKNOWN_HABIT_NAME, habit_name, merge_window,
    trim_window,
};

#[derive(Debug, Display, Error)]
pub enum WallpaperError {
    #[display("No cached habit data, refresh the cache first")]
    NoCache,

    #[display("Error reading habit cache: {_0:#}")]
    Store(#[error(not(source))] anyhow::Error),
}

/// Assembles the per-request habit windows shown on a wallpaper.
#[derive(Debug, Clone)]
pub struct WallpaperService<C, S> {
    source: C,
    cache: HabitCache<S>,
    tracked: Vec<HabitId>,
}

impl<C, S> WallpaperService<C, S>
where
    C: StatusSource,
    S: KeyValueStore,
{
    pub fn new(source: C, cache: HabitCache<S>, tracked: Vec<HabitId>) -> Self {
        Self { source, cache, tracked }
    }

    /// With `live` set, today's status of every habit is fetched from upstream and merged
    /// into its cached window. Otherwise the cached windows are only trimmed to `days`.
    #[tracing::instrument(skip(self))]
    pub async fn current_wallpaper(&self, days: i64, live: bool) -> Result<Vec<HabitSnapshot>, WallpaperError> {
        let habits = self.cache.habits().await.map_err(WallpaperError::Store)?;
        let habits_data = self.cache.habits_data().await.map_err(WallpaperError::Store)?;

        let (habits, habits_data) = match (habits, habits_data) {
            (Some(h), Some(d)) if !h.is_empty() && !d.is_empty() => (h, d),
            _ => return Err(WallpaperError::NoCache),
        };

        let tracked = super::tracked_habits(&self.tracked, habits_data.iter().map(|h| h.id.clone()));
        let today = t!(today);

        let snapshots = futures::future::join_all(tracked.iter().map(|habit_id| {
            let cached = habits_data.iter().find(|h| &h.id == habit_id);
            self.habit_window(habit_id, cached, &habits, days, live, today)
        }))
        .await;

        Ok(snapshots)
    }

    async fn habit_window(
        &self,
        habit_id: &HabitId,
        cached: Option<&HabitSnapshot>,
        habits: &[HabitDefinition],
        days: i64,
        live: bool,
        today: Date,
    ) -> HabitSnapshot {
        let statuses = if live {
            let live_today = self.fetch_today(habit_id, today).await;
            merge_window(cached, live_today, days, today)
        } else {
            trim_window(cached.map(|c| c.statuses.clone()).unwrap_or_default(), days)
        };

        let name = habit_name(habits, habit_id)
            .or_else(|| cached.map(|c| c.name.clone()))
            .unwrap_or_else(|| UNKNOWN_HABIT_NAME.to_owned());

        HabitSnapshot {
            id: habit_id.clone(),
            name,
            statuses,
        }
    }

    async fn fetch_today(&self, habit_id: &HabitId, today: Date) -> Option<StatusRecord> {
        match self.source.fetch_status(habit_id, today).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Live status of {} unavailable, showing cached data only: {}", habit_id, e);
                meter::increment("habitify_fetch_failed", &[("operation", "live")]);
                None
            }
        }
    }
}
