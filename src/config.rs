use clap::{Parser, ValueEnum};
use regex::Regex;
use scraper::Selector;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use crate::utils::error::{AppError, Result};

pub const DEFAULT_PRICE_SELECTOR: &str = "#priceblock_ourprice";
pub const DEFAULT_INTERVAL: &str = "30m";
pub const DEFAULT_USER_AGENT: &str = concat!("uatu-pricewatch/", env!("CARGO_PKG_VERSION"));

static INTERVAL_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0|(?:(?:\d+\.?\d*|\.\d+)(?:ns|us|µs|ms|s|m|h))+)$")
        .expect("valid interval format regex")
});

static INTERVAL_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\.?\d*|\.\d+)(ns|us|µs|ms|s|m|h)").expect("valid interval part regex")
});

/// Watch a single product page and report price changes.
#[derive(Parser, Debug, Clone)]
#[command(name = "uatu-pricewatch", version, about, long_about = None)]
pub struct Cli {
    /// Product page URL to track
    #[arg(long, default_value = "")]
    pub url: String,

    /// Amount of time to wait between price checks (e.g. 90s, 30m, 1h30m)
    #[arg(long, default_value = DEFAULT_INTERVAL, value_parser = parse_interval)]
    pub every: Duration,

    /// CSS selector of the element holding the price
    #[arg(long, default_value = DEFAULT_PRICE_SELECTOR)]
    pub selector: String,

    /// What to do when a check fails
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Fatal)]
    pub on_error: ErrorPolicy,

    /// Where price reports are written
    #[arg(long, value_enum, default_value_t = OutputMode::Auto)]
    pub output: OutputMode,

    /// User agent sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Save the raw page to PATH before polling starts (failures follow --on-error)
    #[arg(long, value_name = "PATH")]
    pub save_page: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicy {
    /// Stop polling on the first failed check
    Fatal,
    /// Log the failure and keep polling
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Console output, cursor control only when stdout is a terminal
    Auto,
    /// Console output with cursor control
    Console,
    /// Reports go through the tracing subscriber
    Log,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scheduler: SchedulerConfig,
    pub scraper: ScraperConfig,
    pub output: OutputMode,
    pub save_page: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub url: String,
    pub interval: Duration,
    pub on_error: ErrorPolicy,
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub selector: String,
    pub user_agent: String,
    pub request_timeout: Option<u64>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_PRICE_SELECTOR.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = AppConfig {
            scheduler: SchedulerConfig {
                url: cli.url,
                interval: cli.every,
                on_error: cli.on_error,
            },
            scraper: ScraperConfig {
                selector: cli.selector,
                user_agent: cli.user_agent,
                request_timeout: cli.timeout,
            },
            output: cli.output,
            save_page: cli.save_page,
        };

        if config.scheduler.url.is_empty() {
            tracing::warn!("No --url given, every price check will fail");
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scheduler.interval.is_zero() {
            return Err(AppError::Config("Poll interval must be greater than 0".into()));
        }

        if self.scraper.selector.trim().is_empty() {
            return Err(AppError::Config("Price selector must not be empty".into()));
        }

        if let Err(e) = Selector::parse(&self.scraper.selector) {
            return Err(AppError::Config(format!(
                "Invalid price selector '{}': {:?}",
                self.scraper.selector, e
            )));
        }

        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::Config("User agent must not be empty".into()));
        }

        if self.scraper.request_timeout == Some(0) {
            return Err(AppError::Config("Request timeout must be greater than 0".into()));
        }

        Ok(())
    }
}

/// Parses a Go-style duration: an optional `+`, then a sequence of
/// `<number><unit>` parts (`30m`, `1h30m`, `1.5h`, `.5h`, `250ms`) or a bare `0`.
/// Negative durations are rejected.
pub fn parse_interval(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    let input = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if !INTERVAL_FORMAT.is_match(input) {
        return Err(AppError::Config(format!(
            "Invalid interval '{}': expected a duration like 90s, 30m or 1h30m",
            input
        )));
    }

    let mut total_nanos = 0f64;
    for captures in INTERVAL_PART.captures_iter(input) {
        let amount: f64 = captures[1]
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid interval amount in '{}'", input)))?;
        let unit_nanos = match &captures[2] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            _ => 3600e9,
        };
        total_nanos += amount * unit_nanos;
    }

    if total_nanos > u64::MAX as f64 {
        return Err(AppError::Config(format!("Interval '{}' is too large", input)));
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
