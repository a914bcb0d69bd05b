//! Formatting helpers shared across UIs.

use crate::calendar::{days_between, DayKey};

/// Format minutes for display (e.g., "45 min", "2h", "1h 30m").
pub fn format_minutes(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest > 0 {
        format!("{}h {}m", hours, rest)
    } else {
        format!("{}h", hours)
    }
}

/// Label for a 0-100 mastery score.
pub fn mastery_label(score: u32) -> &'static str {
    match score {
        90.. => "Expert",
        75..=89 => "Advanced",
        50..=74 => "Intermediate",
        25..=49 => "Beginner",
        _ => "Novice",
    }
}

/// Describe how long ago `last_active` was relative to `today`
/// (e.g., "today", "yesterday", "3 days ago").
pub fn format_last_active(last_active: Option<DayKey>, today: DayKey) -> String {
    let Some(day) = last_active else {
        return "No activity yet".to_string();
    };

    match days_between(day, today) {
        n if n < 0 => "in the future".to_string(),
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        n if n < 7 => format!("{} days ago", n),
        n if n < 30 => format!("{} weeks ago", n / 7),
        _ => day.date().format("%b %d, %Y").to_string(),
    }
}

/// "1 day" / "3 days".
pub fn pluralize_days(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}
