pub mod bluesky;
pub mod rss;
