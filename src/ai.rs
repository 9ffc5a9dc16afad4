//! LLM curation pass: provider abstraction plus the editor prompt that
//! narrows each filtered CSV to police-involved shootings in California.
//!
//! The model gets a numbered list of titles (with short descriptions) and
//! answers with comma-separated indexes to keep. Anything else — a malformed
//! answer, a timeout, a disabled provider — leaves the filtered file
//! uncurated and the cycle moves on.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::article::{Article, PLACEHOLDER};
use crate::store;

/// Descriptions longer than this are left out of the prompt; the title alone
/// is usually enough for the editor call.
const MAX_PROMPT_DESCRIPTION: usize = 250;

const DEFAULT_MODEL: &str = "gpt-4o";

const EDITOR_PROMPT: &str = "You are an experienced news editor curating incident reports. \
From the numbered list below, keep only the stories where a law-enforcement officer \
(of any rank or agency) shot a person, and only if the incident happened in the state \
of California. A shooting not committed by an officer does not qualify. It is normal \
if nothing qualifies.";

pub trait AiClient: Send + Sync {
    /// Send one prompt and return the raw completion text, if any.
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;

    fn provider_name(&self) -> &'static str;
}

pub type DynAiClient = Arc<dyn AiClient>;

/// Factory honoring `AI_TEST_MODE=mock`. Without `OPENAI_API_KEY` the pass is
/// disabled and every filtered file is left as-is.
pub fn build_client_from_env() -> DynAiClient {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockClient {
            fixed: "1".to_string(),
        });
    }
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let model = std::env::var("OPENAI_MODEL").ok();
            Arc::new(OpenAiClient::new(key, model.as_deref()))
        }
        _ => Arc::new(DisabledClient),
    }
}

/// Chat Completions client. Connection timeout only; the caller bounds the
/// whole call with `tokio::time::timeout`.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model_override: Option<&str>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("shooting-news-monitor/0.1")
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            model: model_override.unwrap_or(DEFAULT_MODEL).to_string(),
        }
    }
}

impl AiClient for OpenAiClient {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            #[derive(Serialize)]
            struct Msg<'a> {
                role: &'a str,
                content: &'a str,
            }
            #[derive(Serialize)]
            struct Req<'a> {
                model: &'a str,
                messages: Vec<Msg<'a>>,
            }
            #[derive(Deserialize)]
            struct Resp {
                choices: Vec<Choice>,
            }
            #[derive(Deserialize)]
            struct Choice {
                message: ChoiceMsg,
            }
            #[derive(Deserialize)]
            struct ChoiceMsg {
                content: String,
            }

            let req = Req {
                model: &self.model,
                messages: vec![Msg {
                    role: "user",
                    content: prompt,
                }],
            };
            let resp = self
                .http
                .post("https://api.openai.com/v1/chat/completions")
                .bearer_auth(&self.api_key)
                .json(&req)
                .send()
                .await
                .ok()?;
            if !resp.status().is_success() {
                warn!(status = %resp.status(), "openai returned non-success status");
                return None;
            }
            let body: Resp = resp.json().await.ok()?;
            body.choices.into_iter().next().map(|c| c.message.content)
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Returns `None` always; used when no API key is configured.
pub struct DisabledClient;

impl AiClient for DisabledClient {
    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async { None })
    }

    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Fixed-response client for tests and `AI_TEST_MODE=mock`.
#[derive(Clone)]
pub struct MockClient {
    pub fixed: String,
}

impl AiClient for MockClient {
    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        let out = self.fixed.clone();
        Box::pin(async move { Some(out) })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Build the numbered-list prompt for one file's articles.
pub fn build_prompt(articles: &[Article]) -> String {
    let mut lines = Vec::with_capacity(articles.len());
    for (i, article) in articles.iter().enumerate() {
        let description = article.description.trim();
        if description.is_empty()
            || description == PLACEHOLDER
            || description.chars().count() > MAX_PROMPT_DESCRIPTION
        {
            lines.push(format!("{}. {}", i + 1, article.title));
        } else {
            lines.push(format!(
                "{}. {}, description: {}",
                i + 1,
                article.title,
                description
            ));
        }
    }
    format!(
        "{EDITOR_PROMPT}\n\nI have a list of news titles numbered from 1 to {}:\n\n{}\n\n\
         In the answer put only comma-separated indexes of titles to keep.",
        articles.len(),
        lines.join("\n")
    )
}

/// Parse the model's comma-separated 1-based indexes into 0-based ones. Any
/// malformed token rejects the whole response.
pub fn parse_keep_indexes(response: &str) -> Option<Vec<usize>> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Some(Vec::new());
    }
    let mut indexes = Vec::new();
    for token in trimmed.split(',') {
        match token.trim().parse::<usize>() {
            Ok(n) if n >= 1 => indexes.push(n - 1),
            _ => return None,
        }
    }
    Some(indexes)
}

/// Run the curation pass over one filtered CSV, writing kept rows to
/// `curated`. Skips quietly (logged) when the provider returns nothing, the
/// response is malformed, the model keeps no rows, or the call times out.
pub async fn curate_file(
    client: &DynAiClient,
    filtered: &Path,
    curated: &Path,
    timeout: Duration,
) -> Result<()> {
    let articles = store::load_articles(filtered)
        .with_context(|| format!("loading {}", filtered.display()))?;
    if articles.is_empty() {
        info!(path = %filtered.display(), "no articles to curate");
        return Ok(());
    }

    let prompt = build_prompt(&articles);
    let response = match tokio::time::timeout(timeout, client.complete(&prompt)).await {
        Ok(Some(response)) => response,
        Ok(None) => {
            info!(
                provider = client.provider_name(),
                "no completion, leaving file uncurated"
            );
            return Ok(());
        }
        Err(_) => {
            warn!(path = %filtered.display(), "curation request timed out");
            return Ok(());
        }
    };

    let Some(indexes) = parse_keep_indexes(&response) else {
        warn!(%response, "unparseable index list from model");
        return Ok(());
    };
    if indexes.is_empty() {
        info!(path = %filtered.display(), "model kept no articles");
        return Ok(());
    }

    let kept: Vec<Article> = indexes
        .iter()
        .filter_map(|&i| articles.get(i).cloned())
        .collect();
    store::save_articles(curated, &kept)?;
    info!(path = %curated.display(), kept = kept.len(), "curated file written");
    Ok(())
}
