use std::time::Duration;

use async_trait::async_trait;
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::{SourceError, SourceResult};
use crate::feed::scrub_text;
use crate::feed::types::{FeedEntry, FeedSource};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    description: Option<String>,
}

// <guid isPermaLink="false">…</guid> — attribute ignored, text kept.
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// Generic RSS source: one instance per feed URL. `Fixture` mode parses a
/// canned document (tests), `Http` mode fetches the live feed.
pub struct RssFeedProvider {
    name: String,
    mode: Mode,
    timeout: Duration,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RssFeedProvider {
    pub fn from_fixture(name: impl Into<String>, xml: &str) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Fixture(xml.to_string()),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_url(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    fn parse_items(&self, s: &str) -> SourceResult<Vec<FeedEntry>> {
        let t0 = std::time::Instant::now();
        let rss: Rss =
            from_str(s).map_err(|e| SourceError::Malformed(format!("{}: {e}", self.name)))?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let title = scrub_text(it.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                continue;
            }
            let summary = scrub_text(it.description.as_deref().unwrap_or_default());
            let link = it.link.clone();

            // Stable id first (GUID, then link); title only as a fallback,
            // since distinct articles can share a title.
            let key = it
                .guid
                .and_then(|g| g.value)
                .or_else(|| link.clone())
                .unwrap_or_else(|| title.clone());

            let message = match &link {
                Some(l) => format!("🗞️ {title}\n{l}"),
                None => format!("🗞️ {title}"),
            };

            out.push(FeedEntry {
                key,
                title,
                summary,
                link,
                message,
            });
        }

        histogram!("feed_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

#[async_trait]
impl FeedSource for RssFeedProvider {
    async fn fetch_latest(&self) -> SourceResult<Vec<FeedEntry>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items(s),
            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .timeout(self.timeout)
                    .send()
                    .await?
                    .error_for_status()?;
                let body = resp.text().await?;
                self.parse_items(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
