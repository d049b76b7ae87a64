// src/fixtures/mod.rs
pub mod providers;
pub mod resolver;
pub mod tracker;

use chrono::{DateTime, Utc};

use crate::error::SourceResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureStatus {
    Scheduled,
    Live,
    Finished,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Vendor fixture id, opaque to us.
    pub id: String,
    pub home: String,
    pub away: String,
    pub kickoff: DateTime<Utc>,
    pub status: FixtureStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Goal,
    Card,
    Substitution,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    /// Server-assigned id, when the vendor supplies one.
    pub id: Option<String>,
    pub minute: i32,
    pub kind: EventKind,
    pub team: String,
    pub player: String,
    pub detail: String,
}

impl MatchEvent {
    /// Dedup identity for one tracking run. Prefers the vendor id. The
    /// composite fallback can collide when two same-kind events share
    /// minute, team and player text (e.g. truncated names), so adapters
    /// should surface vendor ids whenever available.
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => format!("id:{id}"),
            None => format!(
                "{}|{}|{}|{:?}",
                self.minute, self.team, self.player, self.kind
            ),
        }
    }
}

/// The unit returned by one polling fetch: where the fixture stands plus
/// every event the vendor currently reports for it.
#[derive(Debug, Clone)]
pub struct FixtureSnapshot {
    pub status: FixtureStatus,
    pub events: Vec<MatchEvent>,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
}

impl Default for FixtureSnapshot {
    fn default() -> Self {
        Self {
            status: FixtureStatus::Unknown,
            events: Vec::new(),
            home_goals: None,
            away_goals: None,
        }
    }
}

/// Abstract fixture-data capability. The resolver and tracker are written
/// against this trait only; vendor envelopes stay inside the adapters.
#[async_trait::async_trait]
pub trait FixtureProvider: Send + Sync {
    /// Upcoming fixtures for a team, any order; the resolver filters and
    /// sorts client-side.
    async fn upcoming_fixtures(&self, team_id: &str) -> SourceResult<Vec<Fixture>>;

    /// Current status plus full event list for one fixture.
    async fn fixture_snapshot(&self, fixture_id: &str) -> SourceResult<FixtureSnapshot>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
