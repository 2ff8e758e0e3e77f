use std::time::Duration;

use crate::error::{AppError, Result};

pub const TARGET_URL: &str = "https://www.cricbuzz.com/live-cricket-scores/32047/eng-vs-ind-1st-test";
pub const ALLOWED_DOMAINS: &[&str] = &["cricbuzz.com", "www.cricbuzz.com"];

/// Seconds between cycles.
pub const POLL_INTERVAL_SECS: u64 = 10;

/// The scoreboard page itself is depth 1.
pub const MAX_DEPTH: usize = 1;

pub const FETCH_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = concat!("scorewatch/", env!("CARGO_PKG_VERSION"));

pub const FIXTURE_TITLE: &str = "IND vs ENG";

/// Notifications sharing a group replace each other instead of stacking.
pub const NOTIFY_GROUP: &str = "cric-crawler";
pub const NOTIFY_SENDER: &str = "com.apple.Safari";
pub const NOTIFY_SOUND: &str = "default";
pub const NOTIFIER_COMMAND: &str = "terminal-notifier";

/// CSS selectors for the live scoreboard markup.
pub mod selectors {
    pub const SUMMARY_BLOCK: &str = "div.cb-min-bat-rw";
    pub const SUMMARY_SCORE: &str = ".cb-font-20.text-bold";
    pub const SUMMARY_RUN_RATE: &str = ".cb-font-12.cb-text-gray";
    pub const TABLE_BLOCK: &str = "div.cb-min-inf";
    pub const TABLE_HEADER: &str = "div.cb-bg-gray";
    pub const TABLE_ROW: &str = "div.cb-min-itm-rw";
    pub const ROW_CELL: &str = "div";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierKind {
    /// Shell out to the desktop notification CLI.
    Command,
    /// Log the payload only.
    Log,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub target_url: String,
    /// Hosts the collector may fetch from (ALLOWED_DOMAINS, comma-separated).
    pub allowed_domains: Vec<String>,
    pub poll_interval: Duration,
    pub max_depth: usize,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub fixture_title: String,
    pub notify_group: String,
    pub notify_sender: String,
    pub notify_sound: String,
    pub notifier: NotifierKind,
    pub notifier_command: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: TARGET_URL.to_string(),
            allowed_domains: ALLOWED_DOMAINS.iter().map(|d| d.to_string()).collect(),
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            max_depth: MAX_DEPTH,
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            fixture_title: FIXTURE_TITLE.to_string(),
            notify_group: NOTIFY_GROUP.to_string(),
            notify_sender: NOTIFY_SENDER.to_string(),
            notify_sound: NOTIFY_SOUND.to_string(),
            notifier: NotifierKind::Command,
            notifier_command: NOTIFIER_COMMAND.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to the compiled-in defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let poll_interval_secs = parse_or(&lookup, "POLL_INTERVAL_SECS", POLL_INTERVAL_SECS)?;
        if poll_interval_secs == 0 {
            return Err(AppError::Config(
                "POLL_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        let max_depth = parse_or(&lookup, "MAX_DEPTH", MAX_DEPTH)?;
        if max_depth == 0 {
            return Err(AppError::Config("MAX_DEPTH must be at least 1".to_string()));
        }
        let fetch_timeout_secs = parse_or(&lookup, "FETCH_TIMEOUT_SECS", FETCH_TIMEOUT_SECS)?;

        let allowed_domains = match lookup("ALLOWED_DOMAINS") {
            Some(raw) => {
                let domains: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if domains.is_empty() {
                    return Err(AppError::Config(
                        "ALLOWED_DOMAINS must name at least one host".to_string(),
                    ));
                }
                domains
            }
            None => defaults.allowed_domains,
        };

        let notifier = match lookup("NOTIFIER").as_deref().map(str::trim) {
            None | Some("") | Some("command") => NotifierKind::Command,
            Some("log") => NotifierKind::Log,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "NOTIFIER must be `command` or `log`, got `{other}`"
                )))
            }
        };

        Ok(Self {
            target_url: lookup("TARGET_URL").unwrap_or(defaults.target_url),
            allowed_domains,
            poll_interval: Duration::from_secs(poll_interval_secs),
            max_depth,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            user_agent: lookup("USER_AGENT").unwrap_or(defaults.user_agent),
            fixture_title: lookup("FIXTURE_TITLE").unwrap_or(defaults.fixture_title),
            notify_group: lookup("NOTIFY_GROUP").unwrap_or(defaults.notify_group),
            notify_sender: lookup("NOTIFY_SENDER").unwrap_or(defaults.notify_sender),
            notify_sound: lookup("NOTIFY_SOUND").unwrap_or(defaults.notify_sound),
            notifier,
            notifier_command: lookup("NOTIFIER_COMMAND").unwrap_or(defaults.notifier_command),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| {
                AppError::Config(format!("{key} must be a non-negative integer, got `{raw}`"))
            }),
        None => Ok(default),
    }
}
