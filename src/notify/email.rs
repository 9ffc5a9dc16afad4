//! Plain-text digest emails, one per source, over authenticated SMTP.

use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use crate::article::Article;
use crate::config::SmtpConfig;

pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSender {
    pub fn new(cfg: &SmtpConfig) -> Result<Self> {
        let creds = Credentials::new(cfg.user.clone(), cfg.pass.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
            .context("invalid SMTP host")?
            .credentials(creds)
            .build();

        let from = cfg.from.parse().context("invalid sender address")?;
        let to = cfg.to.parse().context("invalid recipient address")?;

        Ok(Self { mailer, from, to })
    }

    /// Send one digest listing title, date, and link per retained article.
    pub async fn send_digest(&self, api_name: &str, articles: &[Article]) -> Result<()> {
        let subject = format!("Daily News Articles from {api_name}");
        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(digest_body(articles))
            .context("build email")?;

        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}

fn digest_body(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles available.".to_string();
    }
    articles
        .iter()
        .map(|a| format!("- {} - {}\n  {}", a.title, a.published, a.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}
