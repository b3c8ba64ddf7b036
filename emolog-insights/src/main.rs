//! emolog-insights - emotion journal insights from the command line
//!
//! Reads a JSON journal export, runs the analytics engine over a time window
//! and prints the resulting insights as a terminal report, Markdown or JSON.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Journal: $XDG_DATA_HOME/emolog/journal.json (~/.local/share/emolog/journal.json)
//! - Preferences: $XDG_STATE_HOME/emolog/preferences.json
//! - Logs: $XDG_STATE_HOME/emolog/emolog.YYYY-MM-DD.log
//! - Config: $XDG_CONFIG_HOME/emolog/config.toml (~/.config/emolog/config.toml)

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use emolog_core::analytics::{
    create_default_engine, AnalyticsEngine, AnalyticsPreferences, AnalyticsRequest,
    AnalyticsResult, AnalyticsSummary, EmotionalPattern, PatternData, PreferencesUpdate,
    TimePreset, TimeRange, MIN_LOGS_FOR_INSIGHTS,
};
use emolog_core::format::{format_relative_time_opt, ratio_bar};
use emolog_core::{Config, JournalStore, JsonFileStore};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "emolog-insights")]
#[command(about = "Insights from your emotion journal")]
#[command(version)]
struct Args {
    /// Journal export to read (default: $XDG_DATA_HOME/emolog/journal.json)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Named window ending now (week, month, quarter, year)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    preset: Option<TimePreset>,

    /// First day of a custom window (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day of a custom window (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Export format instead of the terminal report
    #[arg(long, value_enum)]
    export: Option<ExportFormat>,

    /// Print the lightweight dashboard summary only
    #[arg(long)]
    summary: bool,

    /// Watch mode - re-read the journal and re-print on an interval
    #[arg(short, long, conflicts_with = "summary")]
    watch: bool,

    /// Seconds between refreshes (only with --watch; default from config)
    #[arg(long, requires = "watch")]
    interval: Option<u64>,

    /// Stop watch mode after this many refreshes
    #[arg(long, requires = "watch")]
    max_refreshes: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    /// Markdown report
    Md,
    /// The full analytics result as JSON
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = emolog_core::logging::init(&config.logging).ok();

    tracing::info!("emolog-insights starting");

    let journal_path = args.data.clone().unwrap_or_else(|| config.journal_path());
    let store = JsonFileStore::open(&journal_path)
        .with_context(|| format!("failed to open journal {}", journal_path.display()))?;

    let now = Utc::now();
    let offset = config.analytics.offset();
    let preferences_path = Config::preferences_path();

    let mut preferences = config.analytics.preferences(now);
    preferences.last_viewed_insights =
        load_saved_preferences(&preferences_path).and_then(|saved| saved.last_viewed_insights);

    let mut engine = create_default_engine(store)
        .with_offset(offset)
        .with_preferences(preferences);

    let requested = requested_range(&args, &offset, now)?;

    if args.summary {
        if let Some(range) = requested {
            engine
                .update_preferences(PreferencesUpdate::time_range(range))
                .context("failed to apply requested range")?;
        }
        print_summary(&engine, args.export)?;
        return Ok(());
    }

    engine
        .generate_analytics(AnalyticsRequest {
            time_range: requested,
        })
        .context("failed to generate analytics")?;
    render(&engine, args.export)?;

    engine
        .update_preferences(PreferencesUpdate::viewed_at(Utc::now()))
        .context("failed to record view")?;
    if let Err(e) = save_preferences(&preferences_path, engine.preferences()) {
        tracing::warn!(error = %e, "Failed to save preferences");
    }

    if args.watch {
        let interval = args
            .interval
            .unwrap_or(config.analytics.refresh_interval_secs);
        if interval == 0 {
            anyhow::bail!("--interval must be greater than 0");
        }
        run_watch_mode(&mut engine, &args, interval)?;
    }

    tracing::info!("emolog-insights complete");
    Ok(())
}

/// Window named on the command line, if any.
fn requested_range(
    args: &Args,
    offset: &FixedOffset,
    now: DateTime<Utc>,
) -> Result<Option<TimeRange>> {
    match (args.preset, args.from, args.to) {
        (Some(preset), _, _) => Ok(Some(TimeRange::from_preset(preset, now))),
        (None, Some(from), Some(to)) => TimeRange::from_dates(from, to, offset)
            .map(Some)
            .context("invalid --from/--to range"),
        (None, None, None) => Ok(None),
        _ => anyhow::bail!("--from and --to must be given together"),
    }
}

fn load_saved_preferences(path: &Path) -> Option<AnalyticsPreferences> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(preferences) => Some(preferences),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable preferences");
            None
        }
    }
}

fn save_preferences(path: &Path, preferences: &AnalyticsPreferences) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(preferences)?)?;
    Ok(())
}

/// Run continuous watch mode
fn run_watch_mode<S: JournalStore>(
    engine: &mut AnalyticsEngine<S>,
    args: &Args,
    interval_secs: u64,
) -> Result<()> {
    // Set up signal handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nShutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    println!(
        "Watch mode active (refresh every {}s). Press Ctrl+C to stop.",
        interval_secs
    );
    println!();

    let mut refreshes = 0u64;

    while running.load(Ordering::SeqCst) {
        if args.max_refreshes.is_some_and(|max| refreshes >= max) {
            break;
        }

        thread::sleep(Duration::from_secs(interval_secs));
        if !running.load(Ordering::SeqCst) {
            break;
        }
        refreshes += 1;

        // A bad read keeps the previous result on screen
        match engine.refresh_data() {
            Ok(Some(result)) => {
                tracing::info!(
                    refreshes,
                    emotion_logs = result.data_count.emotion_logs,
                    "watch refresh"
                );
                let timestamp = chrono::Local::now().format("%H:%M:%S");
                println!("[{}] Refreshed", timestamp);
                render(engine, args.export)?;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Journal refresh failed");
                eprintln!("Warning: refresh failed: {}", e);
            }
        }
    }

    println!("Watch mode stopped.");
    tracing::info!(refreshes, "emolog-insights watch mode stopped");

    Ok(())
}

fn render<S: JournalStore>(
    engine: &AnalyticsEngine<S>,
    format: Option<ExportFormat>,
) -> Result<()> {
    let result = engine.result().context("no analytics to show")?;
    let visible = engine.visible_patterns();

    match format {
        Some(ExportFormat::Json) => print_json(result)?,
        Some(ExportFormat::Md) => print_markdown(result, &visible),
        None => print_terminal(
            result,
            &visible,
            engine.preferences().last_viewed_insights,
        ),
    }
    Ok(())
}

fn days(count: u32) -> String {
    format!("{} day{}", count, if count == 1 { "" } else { "s" })
}

/// Per-pattern detail lines shared by the terminal and Markdown reports.
fn pattern_details(pattern: &EmotionalPattern) -> Vec<String> {
    match &pattern.data {
        PatternData::ExpressionRatio(data) => vec![format!(
            "{} {}% expressed ({} of {})",
            ratio_bar(data.ratio, 20),
            data.percentage,
            data.expressed,
            data.total
        )],
        PatternData::CommonEmotions(data) => data
            .emotions
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {:<16} {:>4}", i + 1, e.emotion, e.count))
            .collect(),
        PatternData::Streak(data) => vec![
            format!("Current:  {}", days(data.current_streak)),
            format!("Longest:  {}", days(data.longest_streak)),
            format!(
                "Expressed on {} of {} logged",
                data.days_with_expressed,
                days(data.total_days)
            ),
        ],
        PatternData::Trend(data) => {
            let mut lines: Vec<String> = data
                .weekly_data
                .iter()
                .map(|week| {
                    format!(
                        "{}  {} {:>3.0}%",
                        week.week_start.format("%b %d"),
                        ratio_bar(week.expression_ratio, 10),
                        week.expression_ratio * 100.0
                    )
                })
                .collect();
            lines.push(format!("Direction: {}", data.trend_direction.as_str()));
            lines
        }
    }
}

fn print_terminal(
    result: &AnalyticsResult,
    patterns: &[&EmotionalPattern],
    last_viewed: Option<DateTime<Utc>>,
) {
    let title = format!("EMOTION INSIGHTS: {}", result.time_range.display_name());

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    println!(
        "   {} emotion logs, {} journal entries over {} days",
        result.data_count.emotion_logs,
        result.data_count.journal_entries,
        result.data_count.total_days
    );
    println!();

    if !result.has_sufficient_data {
        println!(
            "   Not enough data yet: log at least {} emotions in this period",
            MIN_LOGS_FOR_INSIGHTS
        );
        println!("   to unlock meaningful insights.");
        println!();
    }

    for pattern in patterns {
        println!("{}", pattern.pattern_type.title().to_uppercase());
        println!("   {}", pattern.insight);
        for line in pattern_details(pattern) {
            println!("   {}", line);
        }
        println!("   {}", pattern.encouragement);
        println!();
    }

    println!(
        "Last viewed: {}",
        format_relative_time_opt(last_viewed, Utc::now())
    );
}

fn print_markdown(result: &AnalyticsResult, patterns: &[&EmotionalPattern]) {
    println!("# Emotion Insights: {}", result.time_range.display_name());
    println!();

    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Emotion logs | {} |", result.data_count.emotion_logs);
    println!("| Journal entries | {} |", result.data_count.journal_entries);
    println!("| Days | {} |", result.data_count.total_days);
    println!();

    if !result.has_sufficient_data {
        println!(
            "*Not enough data yet: log at least {} emotions in this period to unlock meaningful insights.*",
            MIN_LOGS_FOR_INSIGHTS
        );
        println!();
    }

    for pattern in patterns {
        println!("## {}", pattern.pattern_type.title());
        println!();
        println!("{}", pattern.insight);
        println!();
        for line in pattern_details(pattern) {
            println!("- {}", line);
        }
        println!();
        println!("*{}*", pattern.encouragement);
        println!();
    }

    println!("---");
    println!("*Generated by emolog-insights*");
}

fn print_json(result: &AnalyticsResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

fn print_summary<S: JournalStore>(
    engine: &AnalyticsEngine<S>,
    format: Option<ExportFormat>,
) -> Result<()> {
    let summary = engine.analytics_summary().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to compute summary, showing defaults");
        eprintln!("Warning: could not compute summary ({}), showing defaults", e);
        AnalyticsSummary::default()
    });
    let range = engine.preferences().default_time_range.display_name();
    let top = summary.most_common_emotion.as_deref().unwrap_or("none yet");

    match format {
        Some(ExportFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some(ExportFormat::Md) => {
            println!("# Emotion Summary: {}", range);
            println!();
            println!("| Metric | Value |");
            println!("|--------|-------|");
            println!("| Emotions logged | {} |", summary.total_emotions);
            println!("| Expressed | {} |", summary.expressed_emotions);
            println!("| Expression ratio | {} |", summary.ratio_display());
            println!("| Current streak | {} |", days(summary.current_streak));
            println!("| Most common | {} |", top);
            println!("| Active days | {} |", summary.active_days);
        }
        None => {
            println!("SUMMARY ({})", range);
            println!(
                "   Emotions: {:<10} Expressed: {} ({})",
                summary.total_emotions,
                summary.expressed_emotions,
                summary.ratio_display()
            );
            println!(
                "   Streak:   {:<10} Active days: {}",
                days(summary.current_streak),
                summary.active_days
            );
            println!("   Most common: {}", top);
        }
    }
    Ok(())
}
