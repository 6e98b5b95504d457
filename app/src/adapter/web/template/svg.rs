use super::{Wallpaper, best_habit_line, display_name};
use crate::habit::HabitStatus;

const LABEL_RIGHT: u32 = 240;
const GRID_LEFT: u32 = 260;
const GRID_TOP: u32 = 400;
const ROW_HEIGHT: u32 = 55;
const FONT: &str = "-apple-system, system-ui";

pub fn render(wallpaper: &Wallpaper) -> String {
    let (cell, gap) = wallpaper.cell_layout(300);
    let center = wallpaper.width / 2;
    let score_x = GRID_LEFT + wallpaper.cells() as u32 * (cell + gap) + 20;

    let rows: String = wallpaper
        .habits
        .iter()
        .enumerate()
        .map(|(index, habit)| {
            let y = GRID_TOP + index as u32 * ROW_HEIGHT;
            let text_y = (y + cell).saturating_sub(8);

            let cells: String = habit
                .statuses
                .iter()
                .enumerate()
                .map(|(day_index, day)| {
                    let x = GRID_LEFT + day_index as u32 * (cell + gap);
                    let (fill, glow) = match day.status {
                        HabitStatus::Completed => ("#10b981", r#" filter="url(#glow)""#),
                        HabitStatus::InProgress => ("#fbbf24", ""),
                        HabitStatus::Skipped => ("rgba(255,255,255,0.08)", ""),
                    };
                    format!(
                        r#"<rect x="{x}" y="{y}" width="{cell}" height="{cell}" rx="6" fill="{fill}"{glow}/>"#
                    )
                })
                .collect();

            format!(
                r#"
  <text x="{LABEL_RIGHT}" y="{text_y}" font-family="{FONT}" font-size="19" font-weight="700" text-anchor="end" fill="rgba(255,255,255,0.95)">{name}</text>
  {cells}
  <text x="{score_x}" y="{text_y}" font-family="{FONT}" font-size="17" font-weight="700" fill="rgba(255,255,255,0.6)">{done}/{total}</text>"#,
                name = display_name(&habit.name),
                done = habit.completed_count(),
                total = habit.statuses.len(),
            )
        })
        .collect();

    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="bgGradient" x1="0%" y1="0%" x2="0%" y2="100%">
      <stop offset="0%" style="stop-color:#0f172a;stop-opacity:1" />
      <stop offset="30%" style="stop-color:#1e293b;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#334155;stop-opacity:1" />
    </linearGradient>
    <filter id="glow">
      <feGaussianBlur stdDeviation="10" result="coloredBlur"/>
      <feMerge>
        <feMergeNode in="coloredBlur"/>
        <feMergeNode in="SourceGraphic"/>
      </feMerge>
    </filter>
  </defs>
  <rect width="{width}" height="{height}" fill="url(#bgGradient)"/>
  <text x="{center}" y="180" font-family="{FONT}" font-size="52" font-weight="900" text-anchor="middle" fill="#a78bfa">Habit Calendar</text>
  <text x="{left_stat}" y="280" font-family="{FONT}" font-size="64" font-weight="900" text-anchor="middle" fill="#fbbf24">{percent}%</text>
  <text x="{left_stat}" y="310" font-family="{FONT}" font-size="16" font-weight="600" text-anchor="middle" fill="rgba(255,255,255,0.7)">COMPLETE</text>
  <text x="{right_stat}" y="280" font-family="{FONT}" font-size="64" font-weight="900" text-anchor="middle" fill="#fbbf24">{completed}</text>
  <text x="{right_stat}" y="310" font-family="{FONT}" font-size="16" font-weight="600" text-anchor="middle" fill="rgba(255,255,255,0.7)">DONE</text>
  <text x="{center}" y="355" font-family="{FONT}" font-size="18" font-weight="600" text-anchor="middle" fill="#10b981">{habit_count} HABITS  {best}</text>
{rows}
  <text x="{center}" y="{footer_y}" font-family="{FONT}" font-size="18" font-weight="600" text-anchor="middle" fill="rgba(255,255,255,0.5)">{date}</text>
</svg>"##,
        width = wallpaper.width,
        height = wallpaper.height,
        left_stat = center.saturating_sub(150),
        right_stat = center + 150,
        percent = wallpaper.stats.completion_percent(),
        completed = wallpaper.stats.completed,
        habit_count = wallpaper.stats.habits,
        best = best_habit_line(&wallpaper.stats),
        footer_y = wallpaper.height.saturating_sub(80),
        date = wallpaper.today.to_long_string(),
    )
}
