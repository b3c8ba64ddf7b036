//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/emolog/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/emolog/` (~/.config/emolog/)
//! - Data: `$XDG_DATA_HOME/emolog/` (~/.local/share/emolog/)
//! - State/Logs: `$XDG_STATE_HOME/emolog/` (~/.local/state/emolog/)

use crate::analytics::{
    local_offset, AnalyticsPreferences, PatternType, TimePreset, TimeRange,
};
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Largest UTC offset chrono accepts, in minutes.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analytics defaults
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where the journal export lives
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Analytics configuration
#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    /// Window used when no range is requested
    #[serde(default = "default_preset")]
    pub default_preset: TimePreset,

    /// Insight types shown by default
    #[serde(default = "default_enabled_insights")]
    pub enabled_insights: Vec<PatternType>,

    /// Pin day boundaries to this UTC offset instead of the machine's
    pub utc_offset_minutes: Option<i32>,

    /// Seconds between refreshes in watch mode
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            enabled_insights: default_enabled_insights(),
            utc_offset_minutes: None,
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl AnalyticsConfig {
    /// Initial preferences built from the configured defaults.
    pub fn preferences(&self, now: DateTime<Utc>) -> AnalyticsPreferences {
        AnalyticsPreferences {
            default_time_range: TimeRange::from_preset(self.default_preset, now),
            enabled_insights: self.enabled_insights.clone(),
            last_viewed_insights: None,
        }
    }

    /// Offset used for day and week bucketing.
    ///
    /// Falls back to the machine's local offset when unset or out of range.
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or_else(local_offset)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if let Some(minutes) = self.utc_offset_minutes {
            if minutes.abs() >= MAX_OFFSET_MINUTES {
                return Err(Error::Config(format!(
                    "analytics.utc_offset_minutes must be within ±{} (got {})",
                    MAX_OFFSET_MINUTES - 1,
                    minutes
                )));
            }
        }
        if self.refresh_interval_secs == 0 {
            return Err(Error::Config(
                "analytics.refresh_interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_preset() -> TimePreset {
    TimePreset::Month
}

fn default_enabled_insights() -> Vec<PatternType> {
    PatternType::ALL.to_vec()
}

fn default_refresh_interval() -> u64 {
    60
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Storage configuration
#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Override path for the JSON journal export
    pub journal_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.analytics.validate()?;
        if self.logging.max_files == 0 {
            return Err(Error::Config(
                "logging.max_files must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The journal export to read: the configured override, else the XDG default.
    pub fn journal_path(&self) -> PathBuf {
        self.storage
            .journal_path
            .clone()
            .unwrap_or_else(Self::default_journal_path)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/emolog/config.toml` (~/.config/emolog/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("emolog").join("config.toml")
    }

    /// Returns the data directory path (for journal exports)
    ///
    /// `$XDG_DATA_HOME/emolog/` (~/.local/share/emolog/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("emolog")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/emolog/` (~/.local/state/emolog/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("emolog")
    }

    /// `$XDG_DATA_HOME/emolog/journal.json`
    pub fn default_journal_path() -> PathBuf {
        Self::data_dir().join("journal.json")
    }

    /// Saved analytics preferences, written by front ends between runs.
    ///
    /// `$XDG_STATE_HOME/emolog/preferences.json`
    pub fn preferences_path() -> PathBuf {
        Self::state_dir().join("preferences.json")
    }

    /// Directory holding the daily log files (`emolog.YYYY-MM-DD.log`)
    ///
    /// `$XDG_STATE_HOME/emolog/` (~/.local/state/emolog/)
    pub fn log_dir() -> PathBuf {
        Self::state_dir()
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analytics.default_preset, TimePreset::Month);
        assert_eq!(config.analytics.enabled_insights.len(), 4);
        assert_eq!(config.analytics.refresh_interval_secs, 60);
        assert!(config.analytics.utc_offset_minutes.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.storage.journal_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analytics]
default_preset = "quarter"
enabled_insights = ["streak", "expression-ratio"]
utc_offset_minutes = -300
refresh_interval_secs = 15

[logging]
level = "debug"

[storage]
journal_path = "/tmp/journal.json"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.analytics.default_preset, TimePreset::Quarter);
        assert_eq!(
            config.analytics.enabled_insights,
            vec![PatternType::Streak, PatternType::ExpressionRatio]
        );
        assert_eq!(
            config.analytics.offset(),
            FixedOffset::west_opt(5 * 3600).unwrap()
        );
        assert_eq!(config.analytics.refresh_interval_secs, 15);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.journal_path(), PathBuf::from("/tmp/journal.json"));
    }

    #[test]
    fn test_unknown_insight_fails_to_parse() {
        let toml = r#"
[analytics]
enabled_insights = ["sentiment"]
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_analytics_validation() {
        let config = AnalyticsConfig {
            utc_offset_minutes: Some(18 * 60),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = AnalyticsConfig {
            refresh_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalyticsConfig {
            utc_offset_minutes: Some(330),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analytics]\nrefresh_interval_secs = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_preferences_from_config() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let config = AnalyticsConfig {
            default_preset: TimePreset::Week,
            enabled_insights: vec![PatternType::Trend],
            ..Default::default()
        };

        let prefs = config.preferences(now);
        assert_eq!(prefs.default_time_range.preset, Some(TimePreset::Week));
        assert_eq!(prefs.default_time_range.end, now);
        assert!(prefs.is_enabled(PatternType::Trend));
        assert!(!prefs.is_enabled(PatternType::Streak));
    }

    #[test]
    fn test_default_journal_path() {
        assert!(Config::default_journal_path().ends_with("emolog/journal.json"));
        assert_eq!(Config::log_dir(), Config::state_dir());
    }
}
