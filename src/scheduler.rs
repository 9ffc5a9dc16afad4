//! Daily orchestration plus the 20-minute RSS tick.
//!
//! Stage order per cycle: fetch/filter every source, LLM curation over each
//! filtered file, spreadsheet mirror, email digests. Every stage catches its
//! own failures, logs them, and the cycle moves on to the next stage/source.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::ai::{curate_file, DynAiClient};
use crate::config::Config;
use crate::notify::EmailSender;
use crate::rss::RssScraper;
use crate::sheets::SheetsClient;
use crate::sources::{self, NewsSource};
use crate::store;

pub struct Orchestrator {
    pub config: Arc<Config>,
    pub sources: Vec<Arc<dyn NewsSource>>,
    pub keywords: Vec<String>,
    pub ai: DynAiClient,
}

impl Orchestrator {
    /// One full daily cycle.
    pub async fn run_cycle(&self) {
        info!("daily job started");

        for source in &self.sources {
            if let Err(e) = sources::run_source(
                source.as_ref(),
                &self.keywords,
                &self.config.results_dir,
                self.config.fetch_delay,
                self.config.window_days,
            )
            .await
            {
                error!(source = source.name(), error = ?e, "source pipeline failed");
            }
        }

        for source in &self.sources {
            let filtered = sources::filtered_path(&self.config.results_dir, source.as_ref());
            let curated = self.curated_path(source.as_ref());
            if let Err(e) =
                curate_file(&self.ai, &filtered, &curated, self.config.ai_timeout).await
            {
                error!(source = source.name(), error = ?e, "curation failed");
            }
        }

        self.mirror_sheets().await;
        self.send_digests().await;

        info!("daily job completed");
    }

    fn curated_path(&self, source: &dyn NewsSource) -> PathBuf {
        self.config
            .curated_dir
            .join(format!("{}_filtered_results.csv", source.name()))
    }

    async fn mirror_sheets(&self) {
        let Some(cfg) = &self.config.sheets else {
            info!("sheets mirror disabled (no service account configured)");
            return;
        };
        let client = match SheetsClient::from_key_file(&cfg.service_account_path) {
            Ok(client) => client,
            Err(e) => {
                error!(error = ?e, "sheets client unavailable");
                return;
            }
        };

        for source in &self.sources {
            let targets = [
                (
                    cfg.raw_spreadsheet.as_deref(),
                    sources::raw_path(&self.config.results_dir, source.as_ref()),
                ),
                (
                    cfg.filtered_spreadsheet.as_deref(),
                    sources::filtered_path(&self.config.results_dir, source.as_ref()),
                ),
                (
                    cfg.curated_spreadsheet.as_deref(),
                    self.curated_path(source.as_ref()),
                ),
            ];
            for (spreadsheet, path) in targets {
                let Some(spreadsheet) = spreadsheet else {
                    continue;
                };
                if !path.exists() {
                    continue;
                }
                if let Err(e) = client.mirror_csv(spreadsheet, source.name(), &path).await {
                    warn!(
                        source = source.name(),
                        path = %path.display(),
                        error = ?e,
                        "sheets mirror failed"
                    );
                }
            }
        }
    }

    async fn send_digests(&self) {
        let Some(cfg) = &self.config.smtp else {
            info!("email digests disabled (no SMTP configured)");
            return;
        };
        let sender = match EmailSender::new(cfg) {
            Ok(sender) => sender,
            Err(e) => {
                error!(error = ?e, "email sender unavailable");
                return;
            }
        };

        for source in &self.sources {
            // Prefer the curated file; fall back to the plain filtered output.
            let curated = self.curated_path(source.as_ref());
            let filtered = sources::filtered_path(&self.config.results_dir, source.as_ref());
            let path = if curated.exists() { curated } else { filtered };

            let articles = match store::load_articles(&path) {
                Ok(articles) => articles,
                Err(e) => {
                    warn!(source = source.name(), error = ?e, "no digest file, skipping source");
                    continue;
                }
            };
            match sender.send_digest(source.display_name(), &articles).await {
                Ok(()) => info!(source = source.name(), count = articles.len(), "digest sent"),
                Err(e) => warn!(source = source.name(), error = ?e, "digest send failed"),
            }
        }
    }
}

/// Run one cycle immediately, then repeat on the daily interval.
pub fn spawn_daily(orchestrator: Arc<Orchestrator>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(orchestrator.config.daily_interval);
        loop {
            ticker.tick().await;
            orchestrator.run_cycle().await;
        }
    })
}

/// Poll the RSS feeds immediately, then on the configured interval.
pub fn spawn_rss(scraper: RssScraper, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            info!("checking RSS feeds for new articles");
            match scraper.run_once().await {
                Ok(added) => info!(added, "RSS check complete"),
                Err(e) => error!(error = ?e, "RSS check failed"),
            }
        }
    })
}
