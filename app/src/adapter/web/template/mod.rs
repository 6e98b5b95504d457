pub mod html;
pub mod svg;

use crate::core::time::Date;
use crate::habit::{HabitSnapshot, HabitStatus, WallpaperStats};

const MAX_NAME_CHARS: usize = 20;
const MAX_CELL_SIZE: u32 = 35;
const DEFAULT_CELLS: usize = 30;

pub struct Wallpaper<'a> {
    pub habits: &'a [HabitSnapshot],
    pub stats: WallpaperStats,
    pub width: u32,
    pub height: u32,
    pub today: Date,
}

impl<'a> Wallpaper<'a> {
    pub fn new(habits: &'a [HabitSnapshot], width: u32, height: u32, today: Date) -> Self {
        Self {
            habits,
            stats: WallpaperStats::of(habits),
            width,
            height,
            today,
        }
    }

    //column count follows the first habit, so rows of a fresh habit stay aligned
    fn cells(&self) -> usize {
        self.habits
            .first()
            .map(|h| h.statuses.len())
            .filter(|len| *len > 0)
            .unwrap_or(DEFAULT_CELLS)
    }

    fn cell_layout(&self, reserved_width: u32) -> (u32, u32) {
        let available = self.width.saturating_sub(reserved_width) / self.cells() as u32;
        let cell = available.min(MAX_CELL_SIZE);
        let gap = (cell / 8).max(3);
        (cell, gap)
    }
}

//"Best: ..." line, absent when nothing was completed yet
fn best_habit_line(stats: &WallpaperStats) -> String {
    match &stats.best_habit {
        Some(name) if stats.completed > 0 => format!("Best: {}", display_name(name)),
        _ => String::new(),
    }
}

fn display_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let truncated: String = name.chars().take(MAX_NAME_CHARS).collect();
        format!("{}...", escape(&truncated))
    } else {
        escape(name)
    }
}

fn status_class(status: HabitStatus) -> &'static str {
    match status {
        HabitStatus::Completed => "completed",
        HabitStatus::InProgress => "in-progress",
        HabitStatus::Skipped => "skipped",
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
