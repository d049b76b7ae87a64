use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::{SourceError, SourceResult};
use crate::feed::types::{FeedEntry, FeedSource};

const DEFAULT_API_BASE: &str = "https://bsky.social";
const TIMELINE_LIMIT: &str = "10";

#[derive(Debug, Deserialize)]
struct Timeline {
    #[serde(default)]
    feed: Vec<TimelineItem>,
}

#[derive(Debug, Deserialize)]
struct TimelineItem {
    post: Option<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    cid: Option<String>,
    uri: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(rename = "createdAt", default)]
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct Session {
    #[serde(rename = "accessJwt")]
    access_jwt: String,
}

/// Access token for the Bluesky session. Providers only read the current
/// value; replacing it is the exclusive business of `refresh`.
struct TokenHolder {
    identifier: String,
    password: String,
    access: Mutex<Option<String>>,
}

impl TokenHolder {
    fn new(identifier: String, password: String) -> Self {
        Self {
            identifier,
            password,
            access: Mutex::new(None),
        }
    }

    async fn current(&self) -> Option<String> {
        self.access.lock().await.clone()
    }

    /// `createSession` against the API; replaces the stored token.
    async fn refresh(
        &self,
        client: &Client,
        api_base: &str,
        timeout: Duration,
    ) -> SourceResult<String> {
        let url = format!("{api_base}/xrpc/com.atproto.server.createSession");
        let resp = client
            .post(&url)
            .timeout(timeout)
            .json(&serde_json::json!({
                "identifier": self.identifier,
                "password": self.password,
            }))
            .send()
            .await?
            .error_for_status()?;
        let session: Session = resp
            .json()
            .await
            .map_err(|e| SourceError::Malformed(format!("createSession: {e}")))?;

        let mut guard = self.access.lock().await;
        *guard = Some(session.access_jwt.clone());
        Ok(session.access_jwt)
    }
}

/// Bluesky actor-timeline source. On a 401 with an `ExpiredToken` body the
/// token is refreshed once and the call retried exactly once.
pub struct BlueskyProvider {
    actor: String,
    api_base: String,
    client: Client,
    timeout: Duration,
    tokens: TokenHolder,
}

impl BlueskyProvider {
    pub fn new(actor: String, identifier: String, password: String) -> Self {
        Self {
            actor,
            api_base: DEFAULT_API_BASE.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
            tokens: TokenHolder::new(identifier, password),
        }
    }

    /// Point at a different API host (test servers).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    async fn timeline_request(&self, token: &str) -> SourceResult<reqwest::Response> {
        let url = format!("{}/xrpc/app.bsky.feed.getActorTimeline", self.api_base);
        Ok(self
            .client
            .get(&url)
            .query(&[("actor", self.actor.as_str()), ("limit", TIMELINE_LIMIT)])
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await?)
    }

    async fn parse_timeline(resp: reqwest::Response) -> SourceResult<Vec<TimelineItem>> {
        let resp = resp.error_for_status()?;
        let timeline: Timeline = resp
            .json()
            .await
            .map_err(|e| SourceError::Malformed(format!("timeline: {e}")))?;
        Ok(timeline.feed)
    }

    async fn fetch_timeline(&self) -> SourceResult<Vec<TimelineItem>> {
        let token = match self.tokens.current().await {
            Some(t) => t,
            None => {
                self.tokens
                    .refresh(&self.client, &self.api_base, self.timeout)
                    .await?
            }
        };

        let resp = self.timeline_request(&token).await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            let body = resp.text().await.unwrap_or_default();
            if !body.contains("ExpiredToken") {
                return Err(SourceError::AuthExpired);
            }
            tracing::info!(target: "feed", "bluesky token expired, refreshing once");
            let fresh = self
                .tokens
                .refresh(&self.client, &self.api_base, self.timeout)
                .await?;
            let retry = self.timeline_request(&fresh).await?;
            if retry.status() == StatusCode::UNAUTHORIZED {
                return Err(SourceError::AuthExpired);
            }
            return Self::parse_timeline(retry).await;
        }
        Self::parse_timeline(resp).await
    }
}

#[async_trait]
impl FeedSource for BlueskyProvider {
    async fn fetch_latest(&self) -> SourceResult<Vec<FeedEntry>> {
        let items = self.fetch_timeline().await?;

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let Some(post) = item.post else { continue };
            // cid preferred, uri as fallback; skip posts with neither.
            let Some(key) = post.cid.clone().or_else(|| post.uri.clone()) else {
                continue;
            };
            if post.text.is_empty() {
                continue;
            }
            let message = format!("🌀 Bluesky:\n{}\n🕒 {}", post.text, post.created_at);
            out.push(FeedEntry {
                key,
                title: post.text.clone(),
                summary: post.text,
                link: post.uri,
                message,
            });
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "Bluesky"
    }
}
