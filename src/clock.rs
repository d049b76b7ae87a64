// src/clock.rs
use std::time::Duration;

use async_trait::async_trait;

/// Timer seam for the fixture-tracking loop so tests can drive it
/// without real delays.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, dur: Duration);
}

/// Production clock backed by the tokio timer.
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}
