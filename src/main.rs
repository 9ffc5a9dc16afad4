//! Binary entrypoint: loads configuration, wires the source adapters, and
//! runs the daily aggregation schedule alongside the RSS poller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shooting_news_monitor::ai;
use shooting_news_monitor::config::Config;
use shooting_news_monitor::keywords;
use shooting_news_monitor::rss::RssScraper;
use shooting_news_monitor::scheduler::{self, Orchestrator};
use shooting_news_monitor::sources::{
    event_registry::EventRegistry, newsapi::NewsApi, newsdata::NewsData, perigon::Perigon,
    NewsSource,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so every config read below sees it.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Arc::new(Config::from_env()?);
    let search = keywords::load_default()?;

    let http = reqwest::Client::builder()
        .user_agent("shooting-news-monitor/0.1")
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()?;

    let sources: Vec<Arc<dyn NewsSource>> = vec![
        Arc::new(NewsApi::new(http.clone(), config.newsapi_key.clone())),
        Arc::new(EventRegistry::new(http.clone(), config.newsapiai_key.clone())),
        Arc::new(NewsData::new(http.clone(), config.newsdata_key.clone())),
        Arc::new(Perigon::new(http.clone(), config.perigon_key.clone())),
    ];

    let orchestrator = Arc::new(Orchestrator {
        config: config.clone(),
        sources,
        keywords: search.keywords.clone(),
        ai: ai::build_client_from_env(),
    });

    let scraper = RssScraper::new(http, search.feeds, search.keywords, config.rss_csv.clone());

    tracing::info!("scheduler started; daily aggregation plus RSS polling");
    let daily = scheduler::spawn_daily(orchestrator);
    let rss = scheduler::spawn_rss(scraper, config.rss_interval);
    let _ = tokio::try_join!(daily, rss);
    Ok(())
}
