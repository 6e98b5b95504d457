use super::{Wallpaper, best_habit_line, display_name, status_class};

pub fn render(wallpaper: &Wallpaper) -> String {
    let (cell, gap) = wallpaper.cell_layout(100);

    let rows: String = wallpaper
        .habits
        .iter()
        .map(|habit| {
            let cells: String = habit
                .statuses
                .iter()
                .map(|day| {
                    format!(
                        r#"<div class="day-cell {}" title="{}"></div>"#,
                        status_class(day.status),
                        day.date
                    )
                })
                .collect();

            format!(
                r#"
        <div class="habit-row">
            <div class="habit-name">{name}</div>
            <div class="days-grid">{cells}</div>
            <div class="habit-score">{done}/{total}</div>
        </div>"#,
                name = display_name(&habit.name),
                cells = cells,
                done = habit.completed_count(),
                total = habit.statuses.len(),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no">
    <title>Habit Calendar</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        html, body {{ width: {width}px; height: {height}px; overflow: hidden; }}
        body {{
            background: linear-gradient(180deg, #0f172a 0%, #1e293b 30%, #334155 100%);
            font-family: -apple-system, BlinkMacSystemFont, 'SF Pro Display', system-ui, sans-serif;
            display: flex;
            flex-direction: column;
            justify-content: space-between;
            padding: 120px 50px 100px 50px;
            color: white;
        }}
        .header {{ text-align: center; margin-bottom: 40px; }}
        .title {{ font-size: 52px; font-weight: 900; letter-spacing: -2px; margin-bottom: 24px; color: #a78bfa; }}
        .stats-row {{ display: flex; gap: 50px; justify-content: center; }}
        .stat-value {{ font-size: 64px; font-weight: 900; line-height: 1; color: #fbbf24; }}
        .stat-label {{ font-size: 16px; opacity: 0.7; margin-top: 8px; text-transform: uppercase; letter-spacing: 3px; }}
        .best-habit {{ font-size: 18px; font-weight: 600; opacity: 0.8; margin-top: 20px; color: #10b981; }}
        .habits-grid {{ flex: 1; display: flex; flex-direction: column; justify-content: center; gap: 28px; }}
        .habit-row {{ display: flex; align-items: center; gap: 16px; }}
        .habit-name {{ width: 220px; font-size: 19px; font-weight: 700; text-align: right; }}
        .days-grid {{ display: flex; gap: {gap}px; }}
        .day-cell {{ width: {cell}px; height: {cell}px; border-radius: 6px; background: rgba(255,255,255,0.08); }}
        .day-cell.completed {{ background: #10b981; box-shadow: 0 0 10px rgba(16,185,129,0.6); }}
        .day-cell.in-progress {{ background: #fbbf24; }}
        .habit-score {{ font-size: 17px; font-weight: 700; opacity: 0.6; }}
        .footer {{ text-align: center; font-size: 18px; opacity: 0.5; }}
    </style>
</head>
<body>
    <div class="header">
        <div class="title">Habit Calendar</div>
        <div class="stats-row">
            <div class="stat-item">
                <div class="stat-value">{percent}%</div>
                <div class="stat-label">Complete</div>
            </div>
            <div class="stat-item">
                <div class="stat-value">{completed}</div>
                <div class="stat-label">Done</div>
            </div>
            <div class="stat-item">
                <div class="stat-value">{habit_count}</div>
                <div class="stat-label">Habits</div>
            </div>
        </div>
        <div class="best-habit">{best}</div>
    </div>
    <div class="habits-grid">{rows}
    </div>
    <div class="footer">
        <div class="date">{date}</div>
    </div>
</body>
</html>"#,
        width = wallpaper.width,
        height = wallpaper.height,
        gap = gap,
        cell = cell,
        percent = wallpaper.stats.completion_percent(),
        completed = wallpaper.stats.completed,
        habit_count = wallpaper.stats.habits,
        best = best_habit_line(&wallpaper.stats),
        rows = rows,
        date = wallpaper.today.to_long_string(),
    )
}

pub fn no_cache_page(update_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body style="font-family:system-ui;display:flex;align-items:center;justify-content:center;min-height:100vh;background:linear-gradient(180deg,#0f172a,#1e293b);color:white;text-align:center;padding:40px;">
<div><h2>No Cache</h2><p style="margin:20px 0;">Call <a href="{url}" style="color:#60a5fa;">{url}</a> first</p></div>
</body></html>"#,
        url = update_url
    )
}

pub fn error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body style="font-family:system-ui;display:flex;align-items:center;justify-content:center;min-height:100vh;background:#0f172a;color:white;text-align:center;">
<div><h1>Error</h1><p>{}</p></div>
</body></html>"#,
        super::escape(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::Date;
    use crate::habit::{HabitId, HabitSnapshot, HabitStatus, StatusRecord};

    fn habits() -> Vec<HabitSnapshot> {
        vec![HabitSnapshot {
            id: HabitId::new("h1"),
            name: "Read <fiction>".to_owned(),
            statuses: vec![
                StatusRecord::new(Date::ymd(2024, 1, 29).unwrap(), HabitStatus::InProgress),
                StatusRecord::new(Date::ymd(2024, 1, 30).unwrap(), HabitStatus::Completed),
            ],
        }]
    }

    #[test]
    fn page_contains_rows_stats_and_date() {
        let habits = habits();
        let wallpaper = Wallpaper::new(&habits, 1284, 2778, Date::ymd(2024, 1, 30).unwrap());

        let html = render(&wallpaper);

        assert!(html.contains("width: 1284px; height: 2778px;"));
        assert!(html.contains("Read &lt;fiction&gt;"));
        assert!(html.contains(r#"<div class="day-cell in-progress" title="2024-01-29"></div>"#));
        assert!(html.contains(r#"<div class="day-cell completed" title="2024-01-30"></div>"#));
        assert!(html.contains(r#"<div class="habit-score">1/2</div>"#));
        assert!(html.contains(r#"<div class="stat-value">50%</div>"#));
        assert!(html.contains("Tuesday, January 30, 2024"));
        assert!(html.contains(r#"<div class="stat-value">1</div>
                <div class="stat-label">Habits</div>"#));
        assert!(html.contains(r#"<div class="best-habit">Best: Read &lt;fiction&gt;</div>"#));
    }

    #[test]
    fn empty_wallpaper_shows_zero_percent() {
        let wallpaper = Wallpaper::new(&[], 1284, 2778, Date::ymd(2024, 1, 30).unwrap());

        let html = render(&wallpaper);

        assert!(html.contains(r#"<div class="stat-value">0%</div>"#));
        assert!(html.contains(r#"<div class="best-habit"></div>"#));
    }

    #[test]
    fn no_cache_page_links_to_refresh() {
        assert!(no_cache_page("/api/update-cache").contains(r#"href="/api/update-cache""#));
    }
}
