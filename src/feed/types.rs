// src/feed/types.rs
use crate::error::SourceResult;

/// One renderable item from a news source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Dedup identity: stable source id (GUID, link, post cid) when the
    /// source provides one, title as a last resort. Normalized on insert
    /// by the seen-set.
    pub key: String,
    pub title: String,
    pub summary: String,
    pub link: Option<String>,
    /// Channel-ready text, rendered by the provider.
    pub message: String,
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Most-recent entries, in the order the source serves them.
    async fn fetch_latest(&self) -> SourceResult<Vec<FeedEntry>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
