// src/feed/scheduler.rs
use std::sync::Arc;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::dedup::SeenSet;
use crate::feed::types::FeedSource;
use crate::notify::Notifier;

#[derive(Clone, Copy, Debug)]
pub struct FeedSchedulerCfg {
    pub interval_secs: u64,
    pub seen_capacity: usize,
}

/// Spawn the periodic news tick: poll every source, deliver new items.
/// Nothing inside a tick may stop the next tick; delivery failures are
/// logged and the item is dropped (its key stays recorded).
pub fn spawn_feed_scheduler(
    cfg: FeedSchedulerCfg,
    keyword: String,
    sources: Vec<Box<dyn FeedSource>>,
    notifier: Arc<dyn Notifier>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut seen = SeenSet::with_capacity(cfg.seen_capacity);
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(cfg.interval_secs));
        loop {
            ticker.tick().await;

            let messages = crate::feed::poll_feeds(&sources, &keyword, &mut seen).await;
            counter!("feed_runs_total").increment(1);
            tracing::info!(target: "feed", new = messages.len(), "feed tick");

            for text in messages {
                if let Err(e) = notifier.deliver(&text).await {
                    tracing::warn!(error = ?e, "news delivery failed");
                }
            }
        }
    })
}
