// src/config.rs
use std::env;

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;

/// News feeds polled by default (the club's usual local press).
pub const DEFAULT_RSS_FEEDS: &[&str] = &[
    "https://www.burgosdeporte.com/index.php/feed/",
    "https://revistaforofos.com/feed/",
    "https://www.burgosconecta.es/burgoscf/rss",
    "https://www.diariodeburgos.es/seccion/burgos+cf/f%C3%BAtbol/deportes/rss",
];

pub const DEFAULT_CHANNEL_ID: &str = "@BurgosCF";
pub const DEFAULT_KEYWORD: &str = "burgos cf";
pub const DEFAULT_BLUESKY_ACTOR: &str = "burgoscf.bsky.social";

#[derive(Debug, Clone)]
pub struct BlueskyCredentials {
    pub actor: String,
    pub identifier: String,
    pub password: String,
}

/// Runtime configuration, read once at startup from the environment.
/// Missing required variables are fatal; everything else has a default.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub channel_id: String,
    pub keyword: String,
    pub rss_feeds: Vec<String>,
    pub feed_interval_secs: u64,
    pub track_interval_secs: u64,
    pub seen_capacity: usize,
    pub http_timeout_secs: u64,
    pub kickoff_offset: FixedOffset,
    /// Vendor team id for fixture lookups.
    pub team_id: String,
    pub football_api_key: Option<String>,
    pub bluesky: Option<BlueskyCredentials>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let telegram_token = match env::var("TELEGRAM_TOKEN") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => bail!("TELEGRAM_TOKEN no está definido. Añádelo como variable de entorno."),
        };

        let channel_id = env_or("CHANNEL_ID", DEFAULT_CHANNEL_ID);
        let keyword = env_or("NEWS_KEYWORD", DEFAULT_KEYWORD);
        let team_id = env_or("TEAM_ID", "2834");

        let rss_feeds = match env::var("RSS_FEEDS") {
            Ok(v) if !v.trim().is_empty() => v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => DEFAULT_RSS_FEEDS.iter().map(|s| s.to_string()).collect(),
        };

        let feed_interval_secs = env_u64("FEED_INTERVAL_SECS", 3600)?;
        let track_interval_secs = env_u64("TRACK_INTERVAL_SECS", 60)?;
        let seen_capacity = env_u64("SEEN_CAPACITY", 512)? as usize;
        let http_timeout_secs = env_u64("HTTP_TIMEOUT_SECS", 10)?;

        let offset_hours = env_u64("KICKOFF_UTC_OFFSET_HOURS", 2)? as i32;
        let kickoff_offset = FixedOffset::east_opt(offset_hours * 3600)
            .context("KICKOFF_UTC_OFFSET_HOURS out of range")?;

        let football_api_key = env::var("FOOTBALL_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());

        // Bluesky is optional: only polled when credentials are present.
        let bluesky = match (
            env::var("BLUESKY_IDENTIFIER").ok().filter(|v| !v.is_empty()),
            env::var("BLUESKY_PASSWORD").ok().filter(|v| !v.is_empty()),
        ) {
            (Some(identifier), Some(password)) => Some(BlueskyCredentials {
                actor: env_or("BLUESKY_ACTOR", DEFAULT_BLUESKY_ACTOR),
                identifier,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            telegram_token,
            channel_id,
            keyword,
            rss_feeds,
            feed_interval_secs,
            track_interval_secs,
            seen_capacity,
            http_timeout_secs,
            kickoff_offset,
            team_id,
            football_api_key,
            bluesky,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{name} must be a non-negative integer, got {v:?}")),
        _ => Ok(default),
    }
}
