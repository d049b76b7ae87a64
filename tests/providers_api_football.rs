// tests/providers_api_football.rs
use burgoscf_bot::fixtures::providers::api_football::ApiFootballProvider;
use burgoscf_bot::fixtures::resolver::next_scheduled_fixture;
use burgoscf_bot::fixtures::{EventKind, FixtureProvider, FixtureStatus};

const FIXTURES_JSON: &str = include_str!("fixtures/api_football_fixtures.json");
const SNAPSHOT_JSON: &str = include_str!("fixtures/api_football_snapshot.json");

#[tokio::test]
async fn fixtures_parse_with_mapped_statuses() {
    let provider = ApiFootballProvider::from_fixtures(FIXTURES_JSON, SNAPSHOT_JSON);

    let fixtures = provider.upcoming_fixtures("2834").await.expect("parse ok");
    assert_eq!(fixtures.len(), 3);
    assert_eq!(fixtures[0].status, FixtureStatus::Finished);
    assert_eq!(fixtures[1].status, FixtureStatus::Scheduled);
    assert_eq!(fixtures[0].home, "Burgos CF");
}

#[tokio::test]
async fn resolver_picks_earliest_scheduled_from_vendor_payload() {
    let provider = ApiFootballProvider::from_fixtures(FIXTURES_JSON, SNAPSHOT_JSON);

    let next = next_scheduled_fixture(&provider, "2834")
        .await
        .expect("resolve ok")
        .expect("a fixture is scheduled");
    // Payload lists the later match first; the earlier kickoff must win.
    assert_eq!(next.id, "22222");
    assert_eq!(next.away, "CD Mirandés");
}

#[tokio::test]
async fn snapshot_maps_events_without_vendor_ids() {
    let provider = ApiFootballProvider::from_fixtures(FIXTURES_JSON, SNAPSHOT_JSON);

    let snap = provider.fixture_snapshot("22222").await.expect("parse ok");
    assert_eq!(snap.status, FixtureStatus::Live);
    assert_eq!(snap.home_goals, Some(1));
    assert_eq!(snap.away_goals, Some(0));
    assert_eq!(snap.events.len(), 3);

    let kinds: Vec<EventKind> = snap.events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::Goal, EventKind::Card, EventKind::Substitution]
    );
    // This vendor assigns no event ids; keys are composite.
    assert!(snap.events.iter().all(|e| e.id.is_none()));
    assert_eq!(snap.events[0].key(), "23|Burgos CF|Curro|Goal");
}

#[tokio::test]
async fn malformed_payload_is_an_error() {
    let provider = ApiFootballProvider::from_fixtures("{not json", "{not json");
    assert!(provider.upcoming_fixtures("2834").await.is_err());
    assert!(provider.fixture_snapshot("1").await.is_err());
}
