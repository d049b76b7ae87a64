// src/fixtures/resolver.rs
use super::{Fixture, FixtureProvider, FixtureStatus};
use crate::error::SourceResult;

/// Earliest fixture still waiting to kick off, or `None` when the team has
/// nothing scheduled. Vendor "next fixture" filters are not trusted:
/// status is checked client-side and kickoffs sorted ascending.
pub async fn next_scheduled_fixture(
    provider: &dyn FixtureProvider,
    team_id: &str,
) -> SourceResult<Option<Fixture>> {
    let fixtures = provider.upcoming_fixtures(team_id).await?;
    Ok(pick_next(fixtures))
}

pub fn pick_next(mut fixtures: Vec<Fixture>) -> Option<Fixture> {
    fixtures.retain(|f| f.status == FixtureStatus::Scheduled);
    fixtures.sort_by_key(|f| f.kickoff);
    fixtures.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn fixture(id: &str, status: FixtureStatus, hours_ahead: i64) -> Fixture {
        Fixture {
            id: id.into(),
            home: "Burgos CF".into(),
            away: "Rival".into(),
            kickoff: Utc::now() + Duration::hours(hours_ahead),
            status,
        }
    }

    #[test]
    fn picks_earliest_scheduled_ignoring_finished() {
        let picked = pick_next(vec![
            fixture("a", FixtureStatus::Finished, -2),
            fixture("b", FixtureStatus::Scheduled, 3),
            fixture("c", FixtureStatus::Scheduled, 1),
        ]);
        assert_eq!(picked.map(|f| f.id), Some("c".to_string()));
    }

    #[test]
    fn none_when_nothing_scheduled() {
        let picked = pick_next(vec![
            fixture("a", FixtureStatus::Finished, -2),
            fixture("b", FixtureStatus::Live, 0),
        ]);
        assert!(picked.is_none());
    }
}
