//! Per-browser dashboard state, keyed by a cookie token.
//!
//! Each visitor gets their own query, run status, loaded table and display
//! mode. The store is shared by the server's worker threads and by the
//! background scrape threads, which report back into it.

mod job;
mod token;

pub use job::{spawn_search, SearchError};
use token::{hash_token, new_token, short_id};

use crate::domain::SearchQuery;
use crate::table::Dataset;
use crate::theme::Mode;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

pub const SESSION_COOKIE: &str = "hotel_scout_session";

/// Idle sessions older than this are dropped when a new one opens.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Live sessions kept at most; the least recently seen idle ones go first.
pub const MAX_SESSIONS: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Idle,
    Running { started_at: DateTime<Utc> },
    Finished { rows: usize, enriched: bool },
    Failed { reason: String },
}

impl RunStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, RunStatus::Running { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Short label for logs and the session's data directory.
    pub id: String,
    pub query: Option<SearchQuery>,
    /// booking.com results page for the current query.
    pub search_link: Option<String>,
    pub status: RunStatus,
    pub dataset: Dataset,
    /// Message shown above the results, e.g. a table that failed to load.
    pub notice: Option<String>,
    pub mode: Mode,
    pub last_seen: DateTime<Utc>,
}

impl SessionContext {
    fn new(id: String, dataset: Dataset, notice: Option<String>) -> Self {
        Self {
            last_seen: Utc::now(),
            id,
            query: None,
            search_link: None,
            status: RunStatus::Idle,
            dataset,
            notice,
            mode: Mode::default(),
        }
    }

    /// Forget the previous search's results before a new one starts.
    pub fn begin_search(&mut self, query: SearchQuery, search_link: String) {
        self.query = Some(query);
        self.search_link = Some(search_link);
        self.status = RunStatus::Running {
            started_at: Utc::now(),
        };
        self.dataset = Dataset::empty();
        self.notice = None;
    }
}

type Sessions = HashMap<[u8; 32], SessionContext>;

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<Sessions>>,
    /// What a new session starts with: the last table on disk, if any.
    initial: Arc<(Dataset, Option<String>)>,
    ttl: Duration,
    capacity: usize,
}

impl SessionStore {
    pub fn new(initial: Dataset, notice: Option<String>) -> Self {
        Self::with_limits(initial, notice, Duration::hours(SESSION_TTL_HOURS), MAX_SESSIONS)
    }

    pub fn with_limits(initial: Dataset, notice: Option<String>, ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            initial: Arc::new((initial, notice)),
            ttl,
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        // Recover the map from a poisoned lock.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a session and return its cookie token, making room first.
    pub fn create(&self) -> String {
        let token = new_token();
        let hash = hash_token(&token);
        let (dataset, notice) = &*self.initial;
        let ctx = SessionContext::new(short_id(&hash), dataset.clone(), notice.clone());

        let mut sessions = self.lock();
        self.evict(&mut sessions, Utc::now());
        sessions.insert(hash, ctx);
        token
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.lock().contains_key(&hash_token(token))
    }

    /// Run `f` on the session, or `None` for an unknown token. Counts as
    /// activity for expiry.
    pub fn with<R>(&self, token: &str, f: impl FnOnce(&mut SessionContext) -> R) -> Option<R> {
        self.lock().get_mut(&hash_token(token)).map(|ctx| {
            ctx.last_seen = Utc::now();
            f(ctx)
        })
    }

    /// Drop expired idle sessions, then the least recently seen idle ones
    /// until a new session fits. Sessions with a running search stay.
    fn evict(&self, sessions: &mut Sessions, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, ctx| ctx.status.is_running() || now - ctx.last_seen < self.ttl);

        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .filter(|(_, ctx)| !ctx.status.is_running())
                .min_by_key(|(_, ctx)| ctx.last_seen)
                .map(|(hash, _)| *hash);
            match oldest {
                Some(hash) => {
                    sessions.remove(&hash);
                }
                None => break,
            }
        }

        let dropped = before - sessions.len();
        if dropped > 0 {
            debug!(dropped, live = sessions.len(), "sessions evicted");
        }
    }

    /// Snapshot for rendering, so no lock is held while building HTML.
    pub fn snapshot(&self, token: &str) -> Option<SessionContext> {
        self.with(token, |ctx| ctx.clone())
    }
}
