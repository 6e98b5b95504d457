mod cache;
#[cfg(test)]
pub mod fake;
mod freshness;
mod refresh;
mod wallpaper;
mod window;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::core::time::{Date, DateTime};

pub use cache::HabitCache;
pub use freshness::{CacheState, describe_cache_state};
pub use refresh::CacheRefreshJob;
pub use wallpaper::{WallpaperError, WallpaperService};
pub use window::{WallpaperStats, completion_rate, merge_window, trim_window};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for HabitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDefinition {
    pub id: HabitId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    Completed,
    InProgress,
    //everything the upstream reports besides the two above (skipped, failed, none, ...)
    #[serde(other)]
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub date: Date,
    pub status: HabitStatus,
}

impl StatusRecord {
    pub fn new(date: Date, status: HabitStatus) -> Self {
        Self { date, status }
    }

    pub fn is_completed(&self) -> bool {
        self.status == HabitStatus::Completed
    }
}

/// Status window of one habit, oldest record first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSnapshot {
    pub id: HabitId,
    pub name: String,
    pub statuses: Vec<StatusRecord>,
}

impl HabitSnapshot {
    pub fn completed_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_completed()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheBlob {
    pub habits: Vec<HabitDefinition>,
    pub habits_data: Vec<HabitSnapshot>,
    pub last_updated: DateTime,
}

impl CacheBlob {
    pub fn total_records(&self) -> usize {
        self.habits_data.iter().map(|h| h.statuses.len()).sum()
    }
}

pub const UNKNOWN_HABIT_NAME: &str = "Unknown";

pub fn habit_name(habits: &[HabitDefinition], id: &HabitId) -> Option<String> {
    habits.iter().find(|h| &h.id == id).map(|h| h.name.clone())
}

//configured habits win, otherwise everything known is tracked
fn tracked_habits(configured: &[HabitId], known: impl IntoIterator<Item = HabitId>) -> Vec<HabitId> {
    if configured.is_empty() {
        known.into_iter().collect()
    } else {
        configured.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_upstream_status_maps_to_skipped() {
        let parsed: Vec<HabitStatus> =
            serde_json::from_str(r#"["completed", "in_progress", "skipped", "failed", "none"]"#).unwrap();

        assert_eq!(
            parsed,
            vec![
                HabitStatus::Completed,
                HabitStatus::InProgress,
                HabitStatus::Skipped,
                HabitStatus::Skipped,
                HabitStatus::Skipped
            ]
        );
    }

    #[test]
    fn cache_blob_uses_camel_case_keys() {
        let blob = CacheBlob {
            habits: vec![],
            habits_data: vec![],
            last_updated: DateTime::from_iso("2024-01-30T12:00:00Z").unwrap(),
        };

        let json = serde_json::to_value(&blob).unwrap();

        assert!(json.get("habitsData").is_some());
        assert_eq!(json["lastUpdated"], "2024-01-30T12:00:00Z");
    }
}
