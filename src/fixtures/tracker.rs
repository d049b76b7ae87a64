// src/fixtures/tracker.rs
//
// Live tracking of one fixture: resolve the next scheduled match, announce
// it, then poll the provider on a fixed interval and emit each match event
// exactly once until the fixture ends. Blocks its own task for the whole
// match, so it runs on a dedicated spawned task, never on the feed tick.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use super::resolver::next_scheduled_fixture;
use super::{EventKind, Fixture, FixtureProvider, FixtureStatus, MatchEvent};
use crate::clock::Clock;
use crate::dedup::SeenSet;
use crate::notify::Notifier;

const NO_FIXTURE_MSG: &str = "⚽ No hay próximos partidos del Burgos CF en el calendario.";

/// Phases of one tracking invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Resolving,
    Announced,
    Polling,
    Finished,
}

#[derive(Debug, Clone)]
pub struct TrackerCfg {
    pub team_id: String,
    pub poll_interval: Duration,
    pub seen_capacity: usize,
    /// Offset used to render kickoff times (Spanish season time).
    pub kickoff_offset: FixedOffset,
}

impl Default for TrackerCfg {
    fn default() -> Self {
        Self {
            team_id: String::new(),
            poll_interval: Duration::from_secs(60),
            seen_capacity: 512,
            kickoff_offset: FixedOffset::east_opt(2 * 3600).expect("static offset"),
        }
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("track_polls_total", "Snapshot fetches during live tracking.");
        describe_counter!("track_events_total", "Match events emitted to the channel.");
        describe_counter!("track_errors_total", "Per-iteration fetch/parse failures.");
    });
}

/// Run one full tracking invocation. Per-iteration fetch failures are
/// logged and the loop keeps polling; only resolution failure or a failed
/// channel delivery of a terminal message propagates as an error.
pub async fn track_next_fixture(
    provider: &dyn FixtureProvider,
    notifier: &dyn Notifier,
    clock: &dyn Clock,
    cancel: CancellationToken,
    cfg: &TrackerCfg,
) -> Result<()> {
    ensure_metrics_described();

    let mut state = TrackState::Resolving;
    tracing::debug!(?state, team = %cfg.team_id, "tracking started");

    let fixture = match next_scheduled_fixture(provider, &cfg.team_id)
        .await
        .context("resolving next fixture")?
    {
        Some(f) => f,
        None => {
            notifier.deliver(NO_FIXTURE_MSG).await?;
            tracing::info!(target: "track", "no upcoming fixture");
            return Ok(());
        }
    };

    state = TrackState::Announced;
    tracing::debug!(?state, fixture = %fixture.id, "transition");
    notifier
        .deliver(&format!(
            "📡 Siguiendo en directo: {} - {}\n🕒 {}",
            fixture.home,
            fixture.away,
            format_kickoff(&fixture, &cfg.kickoff_offset)
        ))
        .await?;

    state = TrackState::Polling;
    tracing::debug!(?state, fixture = %fixture.id, "transition");
    let mut seen = SeenSet::with_capacity(cfg.seen_capacity);

    loop {
        if cancel.is_cancelled() {
            tracing::info!(target: "track", fixture = %fixture.id, "tracking cancelled");
            return Ok(());
        }

        counter!("track_polls_total").increment(1);
        match provider.fixture_snapshot(&fixture.id).await {
            Ok(snap) => {
                if snap.status == FixtureStatus::Finished {
                    if let (Some(h), Some(a)) = (snap.home_goals, snap.away_goals) {
                        notifier
                            .deliver(&format!(
                                "🏁 Final: {} {} - {} {}",
                                fixture.home, h, a, fixture.away
                            ))
                            .await?;
                    }
                    state = TrackState::Finished;
                    tracing::debug!(?state, fixture = %fixture.id, "transition");
                    return Ok(());
                }

                for ev in &snap.events {
                    if !seen.insert(&ev.key()) {
                        continue;
                    }
                    counter!("track_events_total").increment(1);
                    let text = render_event(ev);
                    if let Err(e) = notifier.deliver(&text).await {
                        tracing::warn!(error = ?e, "event delivery failed");
                    }
                }
            }
            Err(e) => {
                // Transient; invisible to the channel, retried next tick.
                counter!("track_errors_total").increment(1);
                tracing::warn!(
                    error = %e,
                    provider = provider.name(),
                    fixture = %fixture.id,
                    "snapshot fetch failed, retrying next interval"
                );
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(target: "track", fixture = %fixture.id, "tracking cancelled");
                return Ok(());
            }
            _ = clock.sleep(cfg.poll_interval) => {}
        }
    }
}

fn render_event(ev: &MatchEvent) -> String {
    let tag = match ev.kind {
        EventKind::Goal => "⚽ GOL",
        EventKind::Card => "🟨 Tarjeta",
        EventKind::Substitution => "🔁 Cambio",
        EventKind::Other => "📌 Incidencia",
    };
    let mut out = format!("{tag} {}' — {} ({})", ev.minute, ev.player, ev.team);
    if !ev.detail.is_empty() {
        out.push('\n');
        out.push_str(&ev.detail);
    }
    out
}

/// Kickoff rendering helper shared with the announcement tests.
pub fn format_kickoff(fixture: &Fixture, offset: &FixedOffset) -> String {
    fixture
        .kickoff
        .with_timezone(offset)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}
