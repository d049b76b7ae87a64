// src/lib.rs
// Public library surface for integration tests (and the bot binary).

pub mod clock;
pub mod commands;
pub mod config;
pub mod dedup;
pub mod error;
pub mod feed;
pub mod fixtures;
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::dedup::SeenSet;
pub use crate::error::{SourceError, SourceResult};
pub use crate::notify::{Notifier, TelegramNotifier};
