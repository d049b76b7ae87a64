//! API-Football (api-sports.io v3) adapter. Events carry no stable server
//! id, so dedup falls back to the composite event key.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{SourceError, SourceResult};
use crate::fixtures::{
    EventKind, Fixture, FixtureProvider, FixtureSnapshot, FixtureStatus, MatchEvent,
};

const DEFAULT_API_BASE: &str = "https://v3.football.api-sports.io";
const UPCOMING_WINDOW: &str = "10";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Vec<FixtureItem>,
}

#[derive(Debug, Deserialize)]
struct FixtureItem {
    fixture: FixtureCore,
    teams: Teams,
    #[serde(default)]
    goals: Option<Goals>,
    #[serde(default)]
    events: Vec<EventItem>,
}

#[derive(Debug, Deserialize)]
struct FixtureCore {
    id: i64,
    date: String,
    status: Status,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    short: String,
}

#[derive(Debug, Deserialize)]
struct Teams {
    home: Team,
    away: Team,
}

#[derive(Debug, Deserialize)]
struct Team {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Goals {
    home: Option<u32>,
    away: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EventItem {
    time: EventTime,
    #[serde(default)]
    team: Option<Team>,
    #[serde(default)]
    player: Option<Player>,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    detail: String,
}

#[derive(Debug, Deserialize)]
struct EventTime {
    #[serde(default)]
    elapsed: i32,
}

#[derive(Debug, Deserialize)]
struct Player {
    #[serde(default)]
    name: Option<String>,
}

fn map_status(short: &str) -> FixtureStatus {
    match short {
        "NS" | "TBD" | "PST" => FixtureStatus::Scheduled,
        "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "LIVE" | "INT" => FixtureStatus::Live,
        "FT" | "AET" | "PEN" => FixtureStatus::Finished,
        _ => FixtureStatus::Unknown,
    }
}

fn map_kind(kind: &str) -> EventKind {
    match kind.to_ascii_lowercase().as_str() {
        "goal" => EventKind::Goal,
        "card" => EventKind::Card,
        "subst" => EventKind::Substitution,
        _ => EventKind::Other,
    }
}

fn parse_kickoff(date: &str) -> SourceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SourceError::Malformed(format!("fixture date {date:?}: {e}")))
}

/// `Fixture` mode holds canned payloads (tests); `Http` mode queries the
/// live API with the account key.
pub struct ApiFootballProvider {
    mode: Mode,
    timeout: Duration,
}

enum Mode {
    Fixture { fixtures: String, snapshot: String },
    Http {
        api_key: String,
        base: String,
        client: reqwest::Client,
    },
}

impl ApiFootballProvider {
    pub fn from_fixtures(fixtures_json: &str, snapshot_json: &str) -> Self {
        Self {
            mode: Mode::Fixture {
                fixtures: fixtures_json.to_string(),
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

    async fn get_envelope(&self, path: &str, query: &[(&str, &str)]) -> SourceResult<Envelope> {
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
            .get(format!("{base}{path}"))
            .header("x-apisports-key", api_key.as_str())
            .query(query)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        resp.json::<Envelope>()
            .await
            .map_err(|e| SourceError::Malformed(format!("api-football envelope: {e}")))
    }

    fn parse_fixtures(body: &str) -> SourceResult<Vec<Fixture>> {
        let env: Envelope = serde_json::from_str(body)
            .map_err(|e| SourceError::Malformed(format!("api-football fixtures: {e}")))?;
        envelope_to_fixtures(env)
    }

    fn parse_snapshot(body: &str) -> SourceResult<FixtureSnapshot> {
        let env: Envelope = serde_json::from_str(body)
            .map_err(|e| SourceError::Malformed(format!("api-football snapshot: {e}")))?;
        envelope_to_snapshot(env)
    }
}

fn envelope_to_fixtures(env: Envelope) -> SourceResult<Vec<Fixture>> {
    let mut out = Vec::with_capacity(env.response.len());
    for item in env.response {
        out.push(Fixture {
            id: item.fixture.id.to_string(),
            home: item.teams.home.name,
            away: item.teams.away.name,
            kickoff: parse_kickoff(&item.fixture.date)?,
            status: map_status(&item.fixture.status.short),
        });
    }
    Ok(out)
}

fn envelope_to_snapshot(env: Envelope) -> SourceResult<FixtureSnapshot> {
    let item = env
        .response
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Malformed("empty fixture response".into()))?;

    let events = item
        .events
        .into_iter()
        .map(|ev| MatchEvent {
            id: None, // no stable event id on this vendor
            minute: ev.time.elapsed,
            kind: map_kind(&ev.kind),
            team: ev.team.map(|t| t.name).unwrap_or_default(),
            player: ev
                .player
                .and_then(|p| p.name)
                .unwrap_or_default(),
            detail: ev.detail,
        })
        .collect();

    Ok(FixtureSnapshot {
        status: map_status(&item.fixture.status.short),
        events,
        home_goals: item.goals.as_ref().and_then(|g| g.home),
        away_goals: item.goals.as_ref().and_then(|g| g.away),
    })
}

#[async_trait]
impl FixtureProvider for ApiFootballProvider {
    async fn upcoming_fixtures(&self, team_id: &str) -> SourceResult<Vec<Fixture>> {
        match &self.mode {
            Mode::Fixture { fixtures, .. } => Self::parse_fixtures(fixtures),
            Mode::Http { .. } => {
                let env = self
                    .get_envelope("/fixtures", &[("team", team_id), ("next", UPCOMING_WINDOW)])
                    .await?;
                envelope_to_fixtures(env)
            }
        }
    }

    async fn fixture_snapshot(&self, fixture_id: &str) -> SourceResult<FixtureSnapshot> {
        match &self.mode {
            Mode::Fixture { snapshot, .. } => Self::parse_snapshot(snapshot),
            Mode::Http { .. } => {
                // /fixtures?id= includes the live event list in the item.
                let env = self.get_envelope("/fixtures", &[("id", fixture_id)]).await?;
                envelope_to_snapshot(env)
            }
        }
    }

    fn name(&self) -> &str {
        "API-Football"
    }
}
