use std::collections::BTreeMap;

use crate::core::time::Date;

use super::{HabitSnapshot, StatusRecord};

/// Combines the cached window of a habit with the freshly fetched record for today.
///
/// Cached records for `today` (or later) are never trusted; today is taken from
/// `live_today` only and is simply missing when the live fetch failed. The result is
/// ordered oldest first, free of duplicate dates and holds at most `days` records.
pub fn merge_window(
    cached: Option<&HabitSnapshot>,
    live_today: Option<StatusRecord>,
    days: i64,
    today: Date,
) -> Vec<StatusRecord> {
    if days <= 0 {
        return vec![];
    }

    let mut statuses: Vec<StatusRecord> = cached
        .map(|snapshot| {
            snapshot
                .statuses
                .iter()
                .filter(|record| record.date < today)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    if let Some(live) = live_today {
        statuses.push(live);
    }

    trim_window(statuses, days)
}

/// Orders records by date and keeps the most recent `days` of them. On duplicate dates
/// the record appearing last in the input wins.
pub fn trim_window(statuses: Vec<StatusRecord>, days: i64) -> Vec<StatusRecord> {
    if days <= 0 {
        return vec![];
    }

    let by_date: BTreeMap<Date, StatusRecord> = statuses.into_iter().map(|s| (s.date, s)).collect();
    let skip = by_date.len().saturating_sub(days as usize);

    by_date.into_values().skip(skip).collect()
}

pub fn completion_rate(statuses: &[StatusRecord]) -> f64 {
    if statuses.is_empty() {
        return 0.0;
    }

    let completed = statuses.iter().filter(|s| s.is_completed()).count();
    completed as f64 / statuses.len() as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperStats {
    pub completed: usize,
    pub total: usize,
    pub habits: usize,
    pub best_habit: Option<String>,
}

impl WallpaperStats {
    pub fn of(snapshots: &[HabitSnapshot]) -> Self {
        let completed = snapshots.iter().map(|h| h.completed_count()).sum();
        let total = snapshots.iter().map(|h| h.statuses.len()).sum();

        let mut best: Option<&HabitSnapshot> = None;
        for snapshot in snapshots {
            if best.is_none_or(|b| snapshot.completed_count() > b.completed_count()) {
                best = Some(snapshot);
            }
        }

        Self {
            completed,
            total,
            habits: snapshots.len(),
            best_habit: best.map(|h| h.name.clone()),
        }
    }

    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        self.completed as f64 / self.total as f64
    }

    pub fn completion_percent(&self) -> u32 {
        (self.completion_rate() * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{HabitId, HabitStatus};

    fn date(day: u32) -> Date {
        Date::ymd(2024, 1, day).unwrap()
    }

    fn record(day: u32, status: HabitStatus) -> StatusRecord {
        StatusRecord::new(date(day), status)
    }

    fn snapshot(days: impl IntoIterator<Item = u32>, status: HabitStatus) -> HabitSnapshot {
        HabitSnapshot {
            id: HabitId::new("habit-1"),
            name: "Read".to_owned(),
            statuses: days.into_iter().map(|d| record(d, status)).collect(),
        }
    }

    fn dates(statuses: &[StatusRecord]) -> Vec<String> {
        statuses.iter().map(|s| s.date.to_string()).collect()
    }

    fn assert_strictly_increasing(statuses: &[StatusRecord]) {
        for pair in statuses.windows(2) {
            assert!(pair[0].date < pair[1].date, "{:?} not before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn live_today_completes_a_month_of_skipped_history() {
        let cached = snapshot(1..=29, HabitStatus::Skipped);
        let live = record(30, HabitStatus::Completed);

        let merged = merge_window(Some(&cached), Some(live.clone()), 30, date(30));

        assert_eq!(merged.len(), 30);
        assert_eq!(merged.first().unwrap().date, date(1));
        assert_eq!(merged.last(), Some(&live));
        assert_eq!((completion_rate(&merged) * 100.0).round(), 3.0);
    }

    #[test]
    fn failed_live_fetch_keeps_cached_history_only() {
        let cached = snapshot(5..=30, HabitStatus::Completed);

        let merged = merge_window(Some(&cached), None, 30, date(31));

        assert_eq!(merged.len(), 26);
        assert_eq!(merged.first().unwrap().date, date(5));
        assert_eq!(merged.last().unwrap().date, date(30));
    }

    #[test]
    fn cached_record_for_today_is_replaced_by_live_one() {
        let mut cached = snapshot(1..=3, HabitStatus::Skipped);
        cached.statuses.push(record(4, HabitStatus::InProgress));
        let live = record(4, HabitStatus::Completed);

        let merged = merge_window(Some(&cached), Some(live.clone()), 30, date(4));

        assert_eq!(dates(&merged), vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"]);
        assert_eq!(merged.last(), Some(&live));
    }

    #[test]
    fn cached_record_for_today_is_dropped_even_without_live_data() {
        let cached = snapshot(1..=4, HabitStatus::Completed);

        let merged = merge_window(Some(&cached), None, 30, date(4));

        assert_eq!(merged.len(), 3);
        assert!(merged.iter().all(|s| s.date != date(4)));
    }

    #[test]
    fn window_keeps_most_recent_records() {
        let cached = snapshot(1..=29, HabitStatus::Skipped);

        let merged = merge_window(Some(&cached), Some(record(30, HabitStatus::Completed)), 7, date(30));

        assert_eq!(merged.len(), 7);
        assert_eq!(merged.first().unwrap().date, date(24));
        assert_eq!(merged.last().unwrap().date, date(30));
    }

    #[test]
    fn unseen_habit_without_live_data_is_empty() {
        assert!(merge_window(None, None, 30, date(30)).is_empty());
    }

    #[test]
    fn unseen_habit_with_live_data_has_single_record() {
        let live = record(30, HabitStatus::InProgress);

        assert_eq!(merge_window(None, Some(live.clone()), 30, date(30)), vec![live]);
    }

    #[test]
    fn zero_or_negative_window_is_empty() {
        let cached = snapshot(1..=29, HabitStatus::Completed);
        let live = record(30, HabitStatus::Completed);

        assert!(merge_window(Some(&cached), Some(live.clone()), 0, date(30)).is_empty());
        assert!(merge_window(Some(&cached), Some(live), -3, date(30)).is_empty());
    }

    #[test]
    fn unordered_and_duplicated_cache_is_normalized() {
        let cached = HabitSnapshot {
            id: HabitId::new("habit-1"),
            name: "Read".to_owned(),
            statuses: vec![
                record(3, HabitStatus::Skipped),
                record(1, HabitStatus::Skipped),
                record(3, HabitStatus::Completed),
                record(2, HabitStatus::InProgress),
                record(2, HabitStatus::InProgress),
            ],
        };

        let merged = merge_window(Some(&cached), Some(record(5, HabitStatus::Completed)), 30, date(5));

        assert_eq!(dates(&merged), vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-05"]);
        assert_eq!(merged[2].status, HabitStatus::Completed);
        assert_strictly_increasing(&merged);
    }

    #[test]
    fn records_after_today_are_not_trusted() {
        let cached = snapshot([1, 2, 6], HabitStatus::Skipped);
        let live = record(5, HabitStatus::Completed);

        let merged = merge_window(Some(&cached), Some(live.clone()), 30, date(5));

        assert_eq!(merged.last(), Some(&live));
        assert_strictly_increasing(&merged);
    }

    #[test]
    fn merge_invariants_hold_for_all_window_sizes() {
        let cached = snapshot([2, 9, 4, 4, 17, 20, 21, 1], HabitStatus::Completed);

        for days in 0..25 {
            for live in [None, Some(record(21, HabitStatus::Skipped))] {
                let merged = merge_window(Some(&cached), live.clone(), days, date(21));

                assert!(merged.len() <= days as usize);
                assert!(merged.iter().all(|s| s.date <= date(21)));
                assert_strictly_increasing(&merged);
                if let (Some(live), true) = (&live, days > 0) {
                    assert_eq!(merged.last(), Some(live));
                } else {
                    assert!(merged.iter().all(|s| s.date != date(21)));
                }
            }
        }
    }

    #[test]
    fn trim_window_keeps_last_records_of_cache() {
        let cached = snapshot(1..=10, HabitStatus::Completed);

        let trimmed = trim_window(cached.statuses, 3);

        assert_eq!(dates(&trimmed), vec!["2024-01-08", "2024-01-09", "2024-01-10"]);
    }

    #[test]
    fn completion_rate_of_empty_window_is_zero() {
        let rate = completion_rate(&[]);

        assert_eq!(rate, 0.0);
        assert!(!rate.is_nan());
    }

    #[test]
    fn completion_rate_counts_only_completed() {
        let statuses = vec![
            record(1, HabitStatus::Completed),
            record(2, HabitStatus::InProgress),
            record(3, HabitStatus::Skipped),
            record(4, HabitStatus::Completed),
        ];

        assert_eq!(completion_rate(&statuses), 0.5);
    }

    #[test]
    fn stats_pick_first_best_habit_on_ties() {
        let mut walk = snapshot(1..=3, HabitStatus::Completed);
        walk.name = "Walk".to_owned();
        let mut read = snapshot(1..=3, HabitStatus::Completed);
        read.name = "Read".to_owned();
        let idle = snapshot(1..=3, HabitStatus::Skipped);

        let stats = WallpaperStats::of(&[idle, walk, read]);

        assert_eq!(stats.completed, 6);
        assert_eq!(stats.total, 9);
        assert_eq!(stats.habits, 3);
        assert_eq!(stats.best_habit.as_deref(), Some("Walk"));
        assert_eq!(stats.completion_percent(), 67);
    }

    #[test]
    fn stats_of_nothing_are_zero() {
        let stats = WallpaperStats::of(&[]);

        assert_eq!(stats.completion_percent(), 0);
        assert_eq!(stats.best_habit, None);
    }
}
