//! BeSoccer adapter. Unlike API-Football this vendor assigns an id to each
//! match event, so dedup rides the stable id instead of the composite key.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::{SourceError, SourceResult};
use crate::fixtures::{
    EventKind, Fixture, FixtureProvider, FixtureSnapshot, FixtureStatus, MatchEvent,
};

const DEFAULT_API_BASE: &str = "https://apiclient.besoccer.com/scripts/api/api.php";

#[derive(Debug, Deserialize)]
struct MatchesEnvelope {
    #[serde(default)]
    matches: Vec<MatchItem>,
}

#[derive(Debug, Deserialize)]
struct MatchItem {
    id: String,
    #[serde(default)]
    local: String,
    #[serde(default)]
    visitor: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    status: i32,
    #[serde(default)]
    local_goals: Option<u32>,
    #[serde(default)]
    visitor_goals: Option<u32>,
    #[serde(default)]
    events: Vec<EventItem>,
}

#[derive(Debug, Deserialize)]
struct EventItem {
    id: Option<String>,
    #[serde(default)]
    minute: i32,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    player: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    text: String,
}

// 0 = not started, 1 = in play, 2 = finished (vendor convention).
fn map_status(status: i32) -> FixtureStatus {
    match status {
        0 => FixtureStatus::Scheduled,
        1 => FixtureStatus::Live,
        2 => FixtureStatus::Finished,
        _ => FixtureStatus::Unknown,
    }
}

fn map_kind(kind: &str) -> EventKind {
    match kind.to_ascii_lowercase().as_str() {
        "goal" | "penalty_goal" | "own_goal" => EventKind::Goal,
        "yellow_card" | "red_card" | "card" => EventKind::Card,
        "substitution" | "subst" => EventKind::Substitution,
        _ => EventKind::Other,
    }
}

// Vendor serves naive "YYYY-MM-DD HH:MM:SS" timestamps in UTC.
fn parse_kickoff(date: &str) -> SourceResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| SourceError::Malformed(format!("match date {date:?}: {e}")))
}

pub struct BeSoccerProvider {
    mode: Mode,
    timeout: Duration,
}

enum Mode {
    Fixture { matches: String, snapshot: String },
    Http {
        api_key: String,
        base: String,
        client: reqwest::Client,
    },
}

impl BeSoccerProvider {
    pub fn from_fixtures(matches_json: &str, snapshot_json: &str) -> Self {
        Self {
            mode: Mode::Fixture {
                matches: matches_json.to_string(),
                snapshot: snapshot_json.to_string(),
            },
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_api_key(api_key: String) -> Self {
        Self {
            mode: Mode::Http {
                api_key,
                base: DEFAULT_API_BASE.to_string(),
                client: reqwest::Client::new(),
            },
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        if let Mode::Http { base: b, .. } = &mut self.mode {
            *b = base.into();
        }
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    async fn get_body(&self, query: &[(&str, &str)]) -> SourceResult<String> {
        let Mode::Http {
            api_key,
            base,
            client,
        } = &self.mode
        else {
            return Err(SourceError::Unavailable(
                "fixture-mode provider has no HTTP endpoint".into(),
            ));
        };
        let resp = client
            .get(base)
            .query(&[("key", api_key.as_str()), ("format", "json")])
            .query(query)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }

    fn parse_matches(body: &str) -> SourceResult<Vec<Fixture>> {
        let env: MatchesEnvelope = serde_json::from_str(body)
            .map_err(|e| SourceError::Malformed(format!("besoccer matches: {e}")))?;

        let mut out = Vec::with_capacity(env.matches.len());
        for m in env.matches {
            out.push(Fixture {
                kickoff: parse_kickoff(&m.date)?,
                id: m.id,
                home: m.local,
                away: m.visitor,
                status: map_status(m.status),
            });
        }
        Ok(out)
    }

    fn parse_snapshot(body: &str) -> SourceResult<FixtureSnapshot> {
        let env: MatchesEnvelope = serde_json::from_str(body)
            .map_err(|e| SourceError::Malformed(format!("besoccer snapshot: {e}")))?;
        let m = env
            .matches
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::Malformed("empty match response".into()))?;

        let events = m
            .events
            .into_iter()
            .map(|ev| MatchEvent {
                id: ev.id,
                minute: ev.minute,
                kind: map_kind(&ev.kind),
                team: ev.team,
                player: ev.player,
                detail: ev.text,
            })
            .collect();

        Ok(FixtureSnapshot {
            status: map_status(m.status),
            events,
            home_goals: m.local_goals,
            away_goals: m.visitor_goals,
        })
    }
}

#[async_trait]
impl FixtureProvider for BeSoccerProvider {
    async fn upcoming_fixtures(&self, team_id: &str) -> SourceResult<Vec<Fixture>> {
        match &self.mode {
            Mode::Fixture { matches, .. } => Self::parse_matches(matches),
            Mode::Http { .. } => {
                let body = self
                    .get_body(&[("req", "matchs"), ("team", team_id)])
                    .await?;
                Self::parse_matches(&body)
            }
        }
    }

    async fn fixture_snapshot(&self, fixture_id: &str) -> SourceResult<FixtureSnapshot> {
        match &self.mode {
            Mode::Fixture { snapshot, .. } => Self::parse_snapshot(snapshot),
            Mode::Http { .. } => {
                let body = self
                    .get_body(&[("req", "events"), ("match", fixture_id)])
                    .await?;
                Self::parse_snapshot(&body)
            }
        }
    }

    fn name(&self) -> &str {
        "BeSoccer"
    }
}
