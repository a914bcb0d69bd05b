//! codelog - coding practice journal
//!
//! Record practice sessions and weekly goals, then review streaks, the
//! activity heatmap and topic mastery.

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use codelog_core::analytics::heatmap::{intensity, max_count, weeks};
use codelog_core::analytics::{
    build_heatmap, current_goal, daily_problem_counts, difficulty_trends, generate_analytics,
    goals_with_progress, recent_activity, Analytics, DifficultyTrend, GoalProgress, HeatmapCell,
    HeatmapWindow,
};
use codelog_core::calendar::parse_timestamp;
use codelog_core::config::MAX_HEATMAP_DAYS;
use codelog_core::detect::{detect_platform, extract_problem_title, suggest_tags};
use codelog_core::format::{format_last_active, format_minutes, mastery_label, pluralize_days};
use codelog_core::{
    Clock, Config, Database, DifficultyLevel, LogType, NewPracticeLog, Platform, PracticeLog,
    Topic, WeekKey, WeeklyGoal,
};

#[derive(Parser, Debug)]
#[command(name = "codelog")]
#[command(about = "Coding practice journal - streaks, heatmap and weekly goals")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a practice session
    Log {
        /// Topic (arrays, strings, linkedlist, trees, graphs, dp, greedy, backtracking, other)
        #[arg(short, long)]
        topic: Topic,

        /// Difficulty (easy, medium, hard); detected from --url when omitted
        #[arg(short, long)]
        difficulty: Option<DifficultyLevel>,

        /// Number of problems solved
        #[arg(short, long, default_value_t = 1)]
        problems: u32,

        /// Minutes spent
        #[arg(short, long)]
        minutes: u32,

        /// When the session happened (YYYY-MM-DD or RFC 3339; default: now)
        #[arg(long)]
        date: Option<String>,

        /// Platform; detected from --url when omitted
        #[arg(long)]
        platform: Option<Platform>,

        /// Session type (practice, contest, learning, mock_interview)
        #[arg(long = "type", default_value = "practice")]
        log_type: LogType,

        /// Problem link
        #[arg(long)]
        url: Option<String>,

        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,

        /// Tag (repeatable); suggested from --url when none given
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Self-assessed effort, 1-5
        #[arg(long)]
        rating: Option<u8>,
    },

    /// Set targets for a week (replaces an existing goal for that week)
    Goal {
        /// Week key YYYY-W (default: current week)
        #[arg(short, long)]
        week: Option<WeekKey>,

        /// Topic the goal counts (repeatable; default: all topics)
        #[arg(short, long = "topic")]
        topics: Vec<Topic>,

        /// Target problem count (default from config)
        #[arg(short, long)]
        problems: Option<u32>,

        /// Target minutes (default from config)
        #[arg(short, long)]
        minutes: Option<u32>,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Show the analytics dashboard
    Stats {
        /// Export format (md = markdown, json = JSON)
        #[arg(long)]
        export: Option<String>,
    },

    /// List weekly goals with progress, newest first
    Goals,

    /// Draw the activity heatmap
    Heatmap {
        /// Days before today to cover (default from config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_HEATMAP_DAYS)))]
        days: Option<u32>,
    },

    /// Delete a practice log by id
    DeleteLog { id: String },

    /// Delete a weekly goal by id
    DeleteGoal { id: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard = match codelog_core::logging::init(&config.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    // Open database
    let db_path = Config::database_path();
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let clock = Clock::system();

    match args.command {
        Command::Log {
            topic,
            difficulty,
            problems,
            minutes,
            date,
            platform,
            log_type,
            url,
            notes,
            tags,
            rating,
        } => {
            let date = match date.as_deref() {
                Some(input) => parse_timestamp(input, &Local)?,
                None => Utc::now(),
            };

            let detected = url.as_deref().map(detect_platform).unwrap_or_default();
            let difficulty = difficulty.or(detected.difficulty).context(
                "--difficulty is required when it cannot be detected from --url",
            )?;

            let tags = match (&url, tags.is_empty()) {
                (Some(url), true) => suggest_tags(url, &extract_problem_title(url)),
                _ => tags,
            };

            let mut new_log = NewPracticeLog::new(date, topic, difficulty, problems, minutes);
            new_log.log_type = log_type;
            new_log.platform = platform.or(detected.platform).unwrap_or_default();
            new_log.notes = notes;
            new_log.tags = tags;
            new_log.problem_url = url;
            new_log.self_rating = rating;

            let log = new_log.build().context("invalid practice log")?;
            db.upsert_log(&log).context("failed to save practice log")?;
            tracing::info!(id = %log.id, topic = log.topic.as_str(), "Recorded practice log");

            println!(
                "Logged {} {} problem{} ({}, {}) on {}",
                log.problem_count,
                log.difficulty_level.as_str(),
                if log.problem_count == 1 { "" } else { "s" },
                log.topic.label(),
                format_minutes(u64::from(log.time_spent)),
                clock.day_of(log.date)
            );
            println!("id: {}", log.id);
        }

        Command::Goal {
            week,
            topics,
            problems,
            minutes,
            notes,
        } => {
            let week = week.unwrap_or_else(|| clock.current_week());
            let mut goal = WeeklyGoal::new(
                week,
                topics,
                problems.unwrap_or(config.goals.target_problems),
                minutes.unwrap_or(config.goals.target_minutes),
            )
            .with_notes(notes);

            let goals = db.load_goals().context("failed to load goals")?;
            if let Some(existing) = goals.iter().find(|g| g.week == week) {
                goal.id = existing.id.clone();
            }
            db.upsert_goal(&goal).context("failed to save goal")?;
            tracing::info!(id = %goal.id, week = %goal.week, "Saved weekly goal");

            let (start, end) = week.span();
            println!(
                "Goal for week {} ({} - {}): {} problems, {}",
                week,
                start,
                end,
                goal.target_problem_count,
                format_minutes(u64::from(goal.target_time))
            );
            println!("id: {}", goal.id);
        }

        Command::Stats { export } => {
            let logs = db.load_logs().context("failed to load practice logs")?;
            let goals = db.load_goals().context("failed to load goals")?;

            let analytics = generate_analytics(&logs, &clock, &config.analytics);
            let trends = difficulty_trends(&logs, &clock, config.analytics.trend_weeks);
            let recent = recent_activity(&logs, config.analytics.recent_limit);
            let goal = current_goal(&goals, &logs, &clock);

            let report = Report {
                analytics: &analytics,
                trends: &trends,
                recent: &recent,
                goal: goal.as_ref(),
            };

            match export.as_deref() {
                Some("json") => print_json(&report)?,
                Some("md") => print_markdown(&report, &clock),
                Some(other) => {
                    anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other)
                }
                None => print_terminal(&report, &clock),
            }
        }

        Command::Goals => {
            let logs = db.load_logs().context("failed to load practice logs")?;
            let goals = db.load_goals().context("failed to load goals")?;
            print_goals(&goals_with_progress(&goals, &logs, clock.zone()), &clock);
        }

        Command::Heatmap { days } => {
            let logs = db.load_logs().context("failed to load practice logs")?;
            let days = days.unwrap_or(config.analytics.heatmap_days);
            let window = HeatmapWindow::trailing(clock.today(), days);
            let series = build_heatmap(&daily_problem_counts(&logs, clock.zone()), window);
            print_heatmap(&series);
        }

        Command::DeleteLog { id } => {
            let log = db.delete_log(&id)?;
            println!(
                "Deleted log {} ({}, {})",
                log.id,
                log.topic.label(),
                clock.day_of(log.date)
            );
        }

        Command::DeleteGoal { id } => {
            let goal = db.delete_goal(&id)?;
            println!("Deleted goal {} (week {})", goal.id, goal.week);
        }
    }

    Ok(())
}

/// Everything the stats views render.
struct Report<'a> {
    analytics: &'a Analytics,
    trends: &'a [DifficultyTrend],
    recent: &'a [&'a PracticeLog],
    goal: Option<&'a WeeklyGoal>,
}

fn print_terminal(report: &Report<'_>, clock: &Clock) {
    let stats = report.analytics;

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", "CODING PRACTICE");
    println!("╰{}╯", "─".repeat(60));
    println!();

    if stats.record_count() == 0 {
        println!("  No practice logged yet.");
        println!();
        return;
    }

    println!("SUMMARY");
    println!(
        "   Problems: {:<12} Time: {}",
        stats.total_problems,
        format_minutes(stats.total_time)
    );
    println!(
        "   Sessions: {:<12} Last active: {}",
        stats.record_count(),
        format_last_active(stats.last_active, clock.today())
    );
    println!();

    println!("STREAKS");
    println!("   Current:  {}", pluralize_days(stats.streak));
    println!("   Longest:  {}", pluralize_days(stats.longest_streak));
    if stats.streak_at_risk {
        println!("   At risk:  practice today to keep it going");
    }
    println!();

    if let Some(goal) = report.goal {
        let progress = GoalProgress::of(goal);
        println!("THIS WEEK ({})", goal.week);
        println!(
            "   Problems: {}/{} ({}%)",
            goal.achieved.problem_count, goal.target_problem_count, progress.problem_percent
        );
        println!(
            "   Time:     {}/{} ({}%)",
            format_minutes(u64::from(goal.achieved.time_spent)),
            format_minutes(u64::from(goal.target_time)),
            progress.time_percent
        );
        println!();
    }

    println!("TOPICS");
    if let Some(topic) = stats.most_practiced_topic() {
        println!("   Most practiced: {}", topic.label());
    }
    for (topic, count) in stats.topic_breakdown.iter().filter(|(_, &c)| c > 0) {
        let mastery = stats.topic_mastery.get(topic).copied().unwrap_or(0);
        println!(
            "   {:<14} {:>4} sessions   mastery {:>3} ({})",
            topic.label(),
            count,
            mastery,
            mastery_label(mastery)
        );
    }
    println!();

    println!("DIFFICULTY");
    for (level, count) in &stats.difficulty_breakdown {
        println!("   {:<8} {:>4}", level.as_str(), count);
    }
    println!();

    if !stats.suggested_focus.is_empty() {
        println!("SUGGESTED FOCUS");
        for (i, topic) in stats.suggested_focus.iter().enumerate() {
            println!("   {}. {}", i + 1, topic.label());
        }
        println!();
    }

    if !report.trends.is_empty() {
        println!("RECENT WEEKS");
        for trend in report.trends {
            println!(
                "   {}  easy {:>3}  medium {:>3}  hard {:>3}",
                trend.week_start, trend.easy, trend.medium, trend.hard
            );
        }
        println!();
    }

    if !report.recent.is_empty() {
        println!("RECENT ACTIVITY");
        for log in report.recent {
            println!(
                "   {}  {:<14} {:>2} x {:<6} {}",
                clock.day_of(log.date),
                log.topic.label(),
                log.problem_count,
                log.difficulty_level.as_str(),
                format_minutes(u64::from(log.time_spent))
            );
        }
        println!();
    }
}

fn print_markdown(report: &Report<'_>, clock: &Clock) {
    let stats = report.analytics;

    println!("# Coding Practice");
    println!();

    if stats.record_count() == 0 {
        println!("*No practice logged yet.*");
        return;
    }

    // Summary table
    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Problems | {} |", stats.total_problems);
    println!("| Time | {} |", format_minutes(stats.total_time));
    println!("| Sessions | {} |", stats.record_count());
    println!("| Current streak | {} |", pluralize_days(stats.streak));
    println!("| Longest streak | {} |", pluralize_days(stats.longest_streak));
    if stats.streak_at_risk {
        println!("| Streak at risk | yes |");
    }
    if let Some(topic) = stats.most_practiced_topic() {
        println!("| Most practiced | {} |", topic.label());
    }
    println!(
        "| Last active | {} |",
        format_last_active(stats.last_active, clock.today())
    );
    println!();

    println!("## Topics");
    println!();
    println!("| Topic | Sessions | Mastery |");
    println!("|-------|----------|---------|");
    for (topic, count) in &stats.topic_breakdown {
        let mastery = stats.topic_mastery.get(topic).copied().unwrap_or(0);
        println!("| {} | {} | {} |", topic.label(), count, mastery);
    }
    println!();

    if !stats.weekly_progress.is_empty() {
        println!("## Weekly Progress");
        println!();
        println!("| Week | Problems | Time |");
        println!("|------|----------|------|");
        for week in &stats.weekly_progress {
            println!(
                "| {} | {} | {} |",
                week.week,
                week.problems,
                format_minutes(week.time)
            );
        }
        println!();
    }

    if let Some(goal) = report.goal {
        let progress = GoalProgress::of(goal);
        println!("## This Week's Goal");
        println!();
        println!(
            "- **Problems:** {}/{} ({}%)",
            goal.achieved.problem_count, goal.target_problem_count, progress.problem_percent
        );
        println!(
            "- **Time:** {}/{} ({}%)",
            format_minutes(u64::from(goal.achieved.time_spent)),
            format_minutes(u64::from(goal.target_time)),
            progress.time_percent
        );
        println!();
    }

    if !stats.suggested_focus.is_empty() {
        println!("## Suggested Focus");
        println!();
        for topic in &stats.suggested_focus {
            println!("- {}", topic.label());
        }
        println!();
    }

    println!("---");
    println!("*Generated by codelog*");
}

fn print_json(report: &Report<'_>) -> Result<()> {
    let json = serde_json::json!({
        "analytics": report.analytics,
        "difficultyTrends": report.trends,
        "recentActivity": report.recent,
        "currentGoal": report.goal.map(|goal| serde_json::json!({
            "goal": goal,
            "progress": GoalProgress::of(goal),
        })),
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_goals(goals: &[WeeklyGoal], clock: &Clock) {
    if goals.is_empty() {
        println!("No weekly goals set.");
        return;
    }

    let this_week = clock.current_week();
    for goal in goals {
        let progress = GoalProgress::of(goal);
        let (start, end) = goal.week.span();
        let marker = if goal.week == this_week { "*" } else { " " };
        let scope = if goal.topics.is_empty() {
            "all topics".to_string()
        } else {
            goal.topics
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(", ")
        };

        println!(
            "{} {:<8} {} - {}  problems {:>3}% ({}/{})  time {:>3}%  [{}]{}",
            marker,
            goal.week,
            start,
            end,
            progress.problem_percent,
            goal.achieved.problem_count,
            goal.target_problem_count,
            progress.time_percent,
            scope,
            if progress.is_complete() { "  done" } else { "" }
        );
        println!("  id: {}", goal.id);
    }
}

fn print_heatmap(series: &[HeatmapCell]) {
    const SHADES: [char; 5] = ['·', '░', '▒', '▓', '█'];
    const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    let max = max_count(series);
    let columns = weeks(series);

    for (row, label) in DAY_LABELS.iter().enumerate() {
        let line: String = columns
            .iter()
            .map(|column| {
                column
                    .iter()
                    .find(|cell| cell.date.weekday_from_sunday() as usize == row)
                    .map(|cell| SHADES[intensity(cell.count, max) as usize])
                    .unwrap_or(' ')
            })
            .collect();
        println!("{} {}", label, line);
    }

    let total: u64 = series.iter().map(|c| u64::from(c.count)).sum();
    let active = series.iter().filter(|c| c.count > 0).count();
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        println!();
        println!(
            "{} - {}: {} problems on {} active day{}",
            first.date,
            last.date,
            total,
            active,
            if active == 1 { "" } else { "s" }
        );
    }
}
