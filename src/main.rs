//! Burgos CF Notification Bot — Binary Entrypoint
//! Wires the news scheduler, the /start command listener and the one-shot
//! fixture tracker onto the tokio runtime.

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use burgoscf_bot::clock::TokioClock;
use burgoscf_bot::commands::CommandListener;
use burgoscf_bot::config::BotConfig;
use burgoscf_bot::feed::providers::bluesky::BlueskyProvider;
use burgoscf_bot::feed::providers::rss::RssFeedProvider;
use burgoscf_bot::feed::scheduler::{spawn_feed_scheduler, FeedSchedulerCfg};
use burgoscf_bot::feed::types::FeedSource;
use burgoscf_bot::fixtures::providers::api_football::ApiFootballProvider;
use burgoscf_bot::fixtures::tracker::{track_next_fixture, TrackerCfg};
use burgoscf_bot::notify::{Notifier, TelegramNotifier};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Short source label from a feed URL (host part), for logs.
fn feed_label(url: &str) -> String {
    url.split('/')
        .find(|part| part.contains('.'))
        .unwrap_or(url)
        .to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op where the environment is injected.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = BotConfig::from_env()?;
    tracing::info!(channel = %cfg.channel_id, feeds = cfg.rss_feeds.len(), "starting bot");

    let notifier: Arc<dyn Notifier> = Arc::new(
        TelegramNotifier::new(cfg.telegram_token.clone(), cfg.channel_id.clone())
            .with_timeout(cfg.http_timeout_secs),
    );

    // News sources: the RSS press list plus, when configured, the club's
    // Bluesky timeline.
    let mut sources: Vec<Box<dyn FeedSource>> = cfg
        .rss_feeds
        .iter()
        .map(|url| {
            Box::new(
                RssFeedProvider::from_url(feed_label(url), url.clone())
                    .with_timeout(cfg.http_timeout_secs),
            ) as Box<dyn FeedSource>
        })
        .collect();
    if let Some(bs) = &cfg.bluesky {
        sources.push(Box::new(
            BlueskyProvider::new(
                bs.actor.clone(),
                bs.identifier.clone(),
                bs.password.clone(),
            )
            .with_timeout(cfg.http_timeout_secs),
        ));
    }

    let feed_task = spawn_feed_scheduler(
        FeedSchedulerCfg {
            interval_secs: cfg.feed_interval_secs,
            seen_capacity: cfg.seen_capacity,
        },
        cfg.keyword.clone(),
        sources,
        notifier.clone(),
    );

    let commands = CommandListener::new(cfg.telegram_token.clone()).spawn();

    // One-shot live tracking, on its own task: the polling loop blocks for
    // the fixture's whole duration.
    let cancel = CancellationToken::new();
    let tracker = cfg.football_api_key.clone().map(|key| {
        let provider = ApiFootballProvider::from_api_key(key).with_timeout(cfg.http_timeout_secs);
        let notifier = notifier.clone();
        let tracker_cfg = TrackerCfg {
            team_id: cfg.team_id.clone(),
            poll_interval: std::time::Duration::from_secs(cfg.track_interval_secs),
            seen_capacity: cfg.seen_capacity,
            kickoff_offset: cfg.kickoff_offset,
        };
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) =
                track_next_fixture(&provider, notifier.as_ref(), &TokioClock, cancel, &tracker_cfg)
                    .await
            {
                tracing::warn!(error = ?e, "fixture tracking ended with error");
            }
        })
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    cancel.cancel();
    if let Some(t) = tracker {
        let _ = t.await;
    }
    feed_task.abort();
    commands.abort();
    Ok(())
}
