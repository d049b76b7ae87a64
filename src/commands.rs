// src/commands.rs
//
// Inbound command surface: a long-poll loop over Telegram getUpdates that
// answers /start with a static acknowledgement.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::task::JoinHandle;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const LONG_POLL_SECS: u64 = 25;
const START_REPLY: &str = "¡Bot del Burgos CF en marcha!";

#[derive(Debug, Deserialize)]
struct UpdatesEnvelope {
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    text: Option<String>,
    chat: Chat,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

pub struct CommandListener {
    api_base: String,
    token: String,
    client: reqwest::Client,
}

impl CommandListener {
    pub fn new(token: String) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Point at a different API host (test servers).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Run the long-poll loop on its own task. A failed getUpdates round
    /// backs off briefly and the loop continues.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut offset: i64 = 0;
            loop {
                match self.poll_once(offset).await {
                    Ok(next) => offset = next,
                    Err(e) => {
                        tracing::warn!(error = ?e, "getUpdates failed");
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        })
    }

    /// One getUpdates round; replies to /start commands, returns the next
    /// update offset.
    pub async fn poll_once(&self, offset: i64) -> Result<i64> {
        let url = format!("{}/bot{}/getUpdates", self.api_base, self.token);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("timeout", LONG_POLL_SECS.to_string()),
                ("offset", offset.to_string()),
            ])
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .send()
            .await
            .context("getUpdates request")?
            .error_for_status()
            .context("getUpdates status")?;
        let env: UpdatesEnvelope = resp.json().await.context("getUpdates body")?;

        let mut next = offset;
        for update in env.result {
            next = next.max(update.update_id + 1);
            let Some(msg) = update.message else { continue };
            let is_start = msg
                .text
                .as_deref()
                .is_some_and(|t| t.trim().starts_with("/start"));
            if is_start {
                // Reply failures must not stall the offset, or the same
                // /start would be answered forever.
                if let Err(e) = self.reply(msg.chat.id, START_REPLY).await {
                    tracing::warn!(error = ?e, chat = msg.chat.id, "start reply failed");
                }
            }
        }
        Ok(next)
    }

    async fn reply(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        self.client
            .post(&url)
            .timeout(Duration::from_secs(10))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .context("sendMessage request")?
            .error_for_status()
            .context("sendMessage status")?;
        Ok(())
    }
}
