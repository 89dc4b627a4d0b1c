//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domain::{
    Ballot, BallotId, BallotService, ExhibitService, ReviewService, SessionManager,
    StaticCredentials,
};
use projections::{DashboardProjector, ReportOptions};
use record_store::RecordStore;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// How long an unfinished ballot is kept before it is swept.
pub const DEFAULT_BALLOT_TTL_SECS: i64 = 60 * 60;

struct OpenBallot {
    opened_at: DateTime<Utc>,
    ballot: Arc<Mutex<Ballot>>,
}

/// Ballots in progress, keyed by id.
///
/// Each ballot sits behind its own lock so a vote can hold it across the
/// store writes without blocking other attendees. Confirmed ballots are
/// removed by the vote handler; abandoned ones are dropped by
/// [`BallotRegistry::sweep_expired`] once older than the registry's TTL.
#[derive(Clone)]
pub struct BallotRegistry {
    ballots: Arc<RwLock<HashMap<BallotId, OpenBallot>>>,
    ttl: Duration,
}

impl Default for BallotRegistry {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_BALLOT_TTL_SECS))
    }
}

impl BallotRegistry {
    /// Creates a registry whose ballots are swept `ttl` after opening.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ballots: Arc::new(RwLock::new(HashMap::new())),
            ttl: ttl.max(Duration::zero()),
        }
    }

    /// Starts a fresh ballot and returns a snapshot of it.
    pub async fn open(&self) -> Ballot {
        let ballot = Ballot::new();
        self.ballots.write().await.insert(
            ballot.id(),
            OpenBallot {
                opened_at: ballot.created_at(),
                ballot: Arc::new(Mutex::new(ballot.clone())),
            },
        );
        ballot
    }

    /// Returns the lock guarding one ballot.
    pub async fn get(&self, id: BallotId) -> Option<Arc<Mutex<Ballot>>> {
        self.ballots
            .read()
            .await
            .get(&id)
            .map(|open| Arc::clone(&open.ballot))
    }

    /// Forgets a ballot. Returns false if it was not registered.
    pub async fn remove(&self, id: BallotId) -> bool {
        self.ballots.write().await.remove(&id).is_some()
    }

    /// Drops every ballot opened at least one TTL before `now`, returning
    /// how many were dropped.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now
            .checked_sub_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut ballots = self.ballots.write().await;
        let before = ballots.len();
        ballots.retain(|_, open| open.opened_at > cutoff);
        before - ballots.len()
    }

    pub async fn len(&self) -> usize {
        self.ballots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Shared application state accessible from all handlers.
pub struct AppState<S: RecordStore> {
    pub exhibit_service: ExhibitService<S>,
    pub review_service: ReviewService<S>,
    pub ballot_service: BallotService<S>,
    pub dashboard: DashboardProjector<S>,
    pub ballots: BallotRegistry,
    pub sessions: SessionManager<StaticCredentials>,
    pub report_options: ReportOptions,
}

impl<S: RecordStore + Clone> AppState<S> {
    /// Wires every service to the same store.
    pub fn new(
        store: S,
        credentials: StaticCredentials,
        session_ttl: Duration,
        ballot_ttl: Duration,
        report_options: ReportOptions,
    ) -> Self {
        Self {
            exhibit_service: ExhibitService::new(store.clone()),
            review_service: ReviewService::new(store.clone()),
            ballot_service: BallotService::new(store.clone()),
            dashboard: DashboardProjector::new(store),
            ballots: BallotRegistry::new(ballot_ttl),
            sessions: SessionManager::new(credentials, session_ttl),
            report_options,
        }
    }
}

impl<S: RecordStore + 'static> AppState<S> {
    /// Drops abandoned ballots and expired admin sessions.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) {
        let ballots = self.ballots.sweep_expired(now).await;
        let sessions = self.sessions.purge_expired(now).await;
        if ballots > 0 || sessions > 0 {
            tracing::debug!(ballots, sessions, "swept expired state");
        }
    }

    /// Runs [`AppState::sweep_expired`] every `period` until the task is aborted.
    pub fn spawn_sweeper(self: &Arc<Self>, period: std::time::Duration) -> JoinHandle<()> {
        let state = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                state.sweep_expired(Utc::now()).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use domain::{AdminAccount, BallotState, ReviewInput};
    use record_store::InMemoryRecordStore;

    use super::*;

    #[tokio::test]
    async fn test_registry_tracks_ballots() {
        let registry = BallotRegistry::default();
        assert!(registry.is_empty().await);

        let ballot = registry.open().await;
        assert_eq!(registry.len().await, 1);

        let stored = registry.get(ballot.id()).await.unwrap();
        stored
            .lock()
            .await
            .submit_review(ReviewInput::new("Ana", 5))
            .unwrap();

        let again = registry.get(ballot.id()).await.unwrap();
        assert_eq!(again.lock().await.state(), BallotState::SelectingExhibit);
        assert!(registry.get(BallotId::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_shrinks_registry() {
        let registry = BallotRegistry::default();
        let mut ids = Vec::new();
        for _ in 0..100 {
            ids.push(registry.open().await.id());
        }
        assert_eq!(registry.len().await, 100);

        for id in &ids {
            assert!(registry.remove(*id).await);
        }
        assert!(registry.is_empty().await);
        assert!(!registry.remove(ids[0]).await);
    }

    #[tokio::test]
    async fn test_sweep_drops_only_expired_ballots() {
        let registry = BallotRegistry::new(Duration::minutes(30));
        let ballot = registry.open().await;
        let opened = ballot.created_at();

        assert_eq!(registry.sweep_expired(opened + Duration::minutes(29)).await, 0);
        assert_eq!(registry.len().await, 1);

        assert_eq!(registry.sweep_expired(opened + Duration::minutes(30)).await, 1);
        assert!(registry.get(ballot.id()).await.is_none());
    }

    #[tokio::test]
    async fn test_app_state_sweeps_ballots_and_sessions() {
        let state = AppState::new(
            InMemoryRecordStore::new(),
            StaticCredentials::new(vec![AdminAccount::new("judge", "s3cret")]),
            Duration::hours(1),
            Duration::hours(1),
            ReportOptions::default(),
        );
        let ballot = state.ballots.open().await;
        state.sessions.login("judge", "s3cret").await.unwrap();

        state
            .sweep_expired(ballot.created_at() + Duration::hours(2))
            .await;

        assert!(state.ballots.is_empty().await);
        assert_eq!(state.sessions.active_count().await, 0);
    }
}
