// =============================================================================
// Telegram Bot API delivery
// =============================================================================
//
// POST https://api.telegram.org/bot{token}/sendMessage
//   { chat_id, text, disable_web_page_preview }
//
// Telegram rejects messages over 4096 characters, so reports are split on
// line boundaries into chunks of at most 4000 characters and sent in order,
// one second apart. Each chunk gets up to 3 attempts with linear backoff.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::Notifier;

pub const MAX_CHUNK_CHARS: usize = 4000;
const MAX_ATTEMPTS: u32 = 3;
const CHUNK_PAUSE: Duration = Duration::from_secs(1);
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Clone)]
struct Credentials {
    token: String,
    chat_id: String,
}

/// Sends report text to one Telegram chat.
///
/// Without a token and chat id the notifier is disabled and only logs a
/// preview of what it would have sent.
#[derive(Clone)]
pub struct TelegramNotifier {
    base_url: String,
    credentials: Option<Credentials>,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(token: Option<String>, chat_id: Option<String>) -> Result<Self> {
        let credentials = match (token, chat_id) {
            (Some(token), Some(chat_id)) if !token.is_empty() && !chat_id.is_empty() => {
                Some(Credentials { token, chat_id })
            }
            _ => None,
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: "https://api.telegram.org".to_string(),
            credentials,
            client,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    fn send_url(&self, token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, token)
    }

    async fn post_chunk(&self, creds: &Credentials, chunk: &str) -> Result<()> {
        let body = SendMessage {
            chat_id: &creds.chat_id,
            text: chunk,
            disable_web_page_preview: true,
        };

        let resp = self
            .client
            .post(self.send_url(&creds.token))
            .json(&body)
            .send()
            .await
            .context("Telegram sendMessage request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram sendMessage returned {}: {}", status, text);
        }
        Ok(())
    }

    async fn post_with_retry(&self, creds: &Credentials, chunk: &str) -> Result<()> {
        let mut attempt = 1;
        loop {
            match self.post_chunk(creds, chunk).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %e, "Telegram delivery failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e.context(format!("giving up after {MAX_ATTEMPTS} attempts")));
                }
            }
        }
    }

    #[instrument(skip(self, text), name = "telegram::send", fields(chars = text.chars().count()))]
    async fn deliver(&self, text: &str) -> Result<()> {
        let creds = match &self.credentials {
            Some(creds) => creds,
            None => {
                info!("Telegram not configured, report preview:\n{}", text);
                return Ok(());
            }
        };

        let chunks = split_message(text, MAX_CHUNK_CHARS);
        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(CHUNK_PAUSE).await;
            }
            self.post_with_retry(creds, chunk).await?;
        }

        info!(chunks = chunks.len(), "report delivered to Telegram");
        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> impl Future<Output = Result<()>> + Send {
        self.deliver(text)
    }
}

/// Split `text` on line boundaries into chunks of at most `max_chars`
/// characters. A single line longer than `max_chars` is cut on character
/// boundaries.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;
    let mut has_line = false;

    for line in text.split('\n') {
        let line_chars = line.chars().count();

        if line_chars > max_chars {
            if has_line {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
                has_line = false;
            }
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if has_line { line_chars + 1 } else { line_chars };
        if has_line && current_chars + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
            has_line = false;
        }

        if has_line {
            current.push('\n');
            current_chars += 1;
        }
        current.push_str(line);
        current_chars += line_chars;
        has_line = true;
    }

    if has_line && !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
