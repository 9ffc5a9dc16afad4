//! Environment-driven configuration.
//!
//! The four news-API keys are required and missing ones fail startup. SMTP,
//! Sheets, and the LLM pass are optional stages that disable themselves when
//! their variables are unset.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub struct Config {
    pub newsapi_key: String,
    pub newsapiai_key: String,
    pub newsdata_key: String,
    pub perigon_key: String,

    pub results_dir: PathBuf,
    pub curated_dir: PathBuf,
    pub rss_csv: PathBuf,

    pub fetch_delay: Duration,
    pub window_days: i64,
    pub daily_interval: Duration,
    pub rss_interval: Duration,
    pub ai_timeout: Duration,

    pub smtp: Option<SmtpConfig>,
    pub sheets: Option<SheetsConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub user: String,
    pub pass: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub service_account_path: PathBuf,
    pub raw_spreadsheet: Option<String>,
    pub filtered_spreadsheet: Option<String>,
    pub curated_spreadsheet: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            newsapi_key: required("NEWSAPI_KEY")?,
            newsapiai_key: required("NEWSAPIAI_KEY")?,
            newsdata_key: required("NEWSDATA_KEY")?,
            perigon_key: required("PERIGON_KEY")?,

            results_dir: PathBuf::from(var_or("RESULTS_DIR", "results")),
            curated_dir: PathBuf::from(var_or("CURATED_DIR", "results_curated")),
            rss_csv: PathBuf::from(var_or("RSS_CSV", "results/rss_results.csv")),

            fetch_delay: Duration::from_secs(parse_or("FETCH_DELAY_SECS", 2)),
            window_days: parse_or("RECENCY_WINDOW_DAYS", 7) as i64,
            daily_interval: Duration::from_secs(parse_or("DAILY_INTERVAL_SECS", 24 * 3600)),
            rss_interval: Duration::from_secs(parse_or("RSS_INTERVAL_SECS", 20 * 60)),
            ai_timeout: Duration::from_secs(parse_or("AI_TIMEOUT_SECS", 500)),

            smtp: SmtpConfig::from_env(),
            sheets: SheetsConfig::from_env(),
        })
    }
}

impl SmtpConfig {
    /// All five values must be present; anything missing disables email.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            host: std::env::var("SMTP_HOST").ok()?,
            user: std::env::var("SMTP_USER").ok()?,
            pass: std::env::var("SMTP_PASS").ok()?,
            from: std::env::var("NOTIFY_EMAIL_FROM").ok()?,
            to: std::env::var("NOTIFY_EMAIL_TO").ok()?,
        })
    }
}

impl SheetsConfig {
    pub fn from_env() -> Option<Self> {
        let path = std::env::var("SHEETS_SERVICE_ACCOUNT").ok()?;
        Some(Self {
            service_account_path: PathBuf::from(path),
            raw_spreadsheet: std::env::var("SHEETS_ID_RAW").ok(),
            filtered_spreadsheet: std::env::var("SHEETS_ID_FILTERED").ok(),
            curated_spreadsheet: std::env::var("SHEETS_ID_CURATED").ok(),
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} missing from environment"))
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
