//! Google Sheets mirror.
//!
//! Authenticates with a service-account key (RS256 assertion exchanged for a
//! bearer token) and rewrites one worksheet per CSV file through the Sheets
//! REST v4 API.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

pub struct SheetsClient {
    http: reqwest::Client,
    key: ServiceAccountKey,
}

impl SheetsClient {
    pub fn from_key_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading service account key {}", path.display()))?;
        let key: ServiceAccountKey =
            serde_json::from_str(&content).context("parsing service account key")?;
        Ok(Self {
            http: reqwest::Client::new(),
            key,
        })
    }

    async fn access_token(&self) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + 3600,
        };
        let assertion = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256),
            &claims,
            &jsonwebtoken::EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
                .context("service account private key")?,
        )
        .context("signing token assertion")?;

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let resp = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .context("token exchange")?
            .error_for_status()
            .context("token exchange non-2xx")?;
        let token: TokenResponse = resp.json().await.context("token response body")?;
        Ok(token.access_token)
    }

    /// Rewrite one worksheet with the rows of a CSV file, creating the
    /// worksheet when it does not exist yet.
    pub async fn mirror_csv(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        csv_path: &Path,
    ) -> Result<()> {
        let rows = read_rows(csv_path)?;
        let row_count = rows.len();
        let token = self.access_token().await?;

        self.ensure_worksheet(&token, spreadsheet_id, worksheet).await;
        self.clear_worksheet(&token, spreadsheet_id, worksheet)
            .await?;

        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{spreadsheet_id}/values/{worksheet}!A1?valueInputOption=RAW"
        );
        let body = serde_json::json!({ "majorDimension": "ROWS", "values": rows });
        self.http
            .put(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .context("values update")?
            .error_for_status()
            .context("values update non-2xx")?;
        info!(spreadsheet_id, worksheet, rows = row_count, "worksheet updated");
        Ok(())
    }

    /// `addSheet` fails when the worksheet already exists; that case is fine
    /// and the clear/update below proceeds either way.
    async fn ensure_worksheet(&self, token: &str, spreadsheet_id: &str, worksheet: &str) {
        let url =
            format!("https://sheets.googleapis.com/v4/spreadsheets/{spreadsheet_id}:batchUpdate");
        let body = serde_json::json!({
            "requests": [{ "addSheet": { "properties": { "title": worksheet } } }]
        });
        if let Err(e) = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
        {
            warn!(worksheet, error = ?e, "addSheet request failed");
        }
    }

    async fn clear_worksheet(
        &self,
        token: &str,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> Result<()> {
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{spreadsheet_id}/values/{worksheet}:clear"
        );
        self.http
            .post(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("values clear")?
            .error_for_status()
            .context("values clear non-2xx")?;
        Ok(())
    }
}

/// Raw string rows, header included, exactly as stored on disk.
fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;
    use crate::store;

    #[test]
    fn read_rows_includes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.csv");
        store::save_articles(
            &path,
            &[Article {
                keyword: "police shooting".into(),
                published: "2024-11-18".into(),
                title: "t".into(),
                description: "d".into(),
                url: "u".into(),
                source: "s".into(),
            }],
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "Keyword");
        assert_eq!(rows[1][2], "t");
    }
}
