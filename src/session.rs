//! In-process conversation sessions
//!
//! Sessions exist only for the lifetime of the process: they are created,
//! appended to, and listed, but never deleted or persisted. The store tracks
//! a single "current" session id (the most recently created one). Command
//! recording does not read that pointer implicitly; callers thread an
//! explicit [`SessionContext`] into each execution instead, so recording is
//! visible at the call site.
//!
//! Two concurrent executions holding contexts for the same session append in
//! completion order, whichever that turns out to be. The store mutex makes
//! each append atomic but deliberately does not order competing commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use ulid::Ulid;

/// One prompt/response exchange, immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Full prompt text as sent to the external tool (context included)
    pub prompt: String,
    /// Response text returned to the caller
    pub response: String,
    /// Completion time of the producing command
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Build an entry stamped with the current time.
    pub fn now(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A conversation session with append-only history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Time-derived unique identifier (ULID)
    pub id: String,
    /// Creation time
    pub start_time: DateTime<Utc>,
    /// Time of the most recent append
    pub last_activity: DateTime<Utc>,
    /// Exchanges in append order
    pub history: Vec<HistoryEntry>,
}

/// Lightweight per-session row for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: usize,
}

#[derive(Debug, Default)]
struct StoreInner {
    sessions: Vec<Session>,
    current: Option<String>,
}

/// Process-wide registry of sessions.
///
/// Internally synchronized; share it behind an `Arc`. Sessions are kept in
/// creation order and never removed.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<StoreInner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session, make it the current one, and return its id.
    pub fn create(&self) -> String {
        let now = Utc::now();
        let id = Ulid::new().to_string().to_lowercase();

        let session = Session {
            id: id.clone(),
            start_time: now,
            last_activity: now,
            history: Vec::new(),
        };

        let mut inner = self.lock();
        inner.sessions.push(session);
        inner.current = Some(id.clone());

        tracing::debug!("Created session {}", id);
        id
    }

    /// Snapshot of a session by id.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.lock().sessions.iter().find(|s| s.id == id).cloned()
    }

    /// Summaries of all known sessions in creation order.
    ///
    /// Each call re-derives the snapshot from current state.
    pub fn list(&self) -> Vec<SessionSummary> {
        self.lock()
            .sessions
            .iter()
            .map(|s| SessionSummary {
                id: s.id.clone(),
                start_time: s.start_time,
                last_activity: s.last_activity,
                message_count: s.history.len(),
            })
            .collect()
    }

    /// Id of the current session, if any session has been created.
    pub fn current_id(&self) -> Option<String> {
        self.lock().current.clone()
    }

    /// Append an entry to a session and bump its activity time.
    ///
    /// Unknown ids are a no-op; executions that outlive interest in their
    /// session simply record nothing.
    pub fn append(&self, id: &str, entry: HistoryEntry) {
        let mut inner = self.lock();
        match inner.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.last_activity = entry.timestamp;
                session.history.push(entry);
            }
            None => tracing::debug!("Ignoring append to unknown session {}", id),
        }
    }

    /// Build a recording context for an existing session.
    pub fn context(self: &Arc<Self>, id: &str) -> Option<SessionContext> {
        if self.get(id).is_some() {
            Some(SessionContext {
                store: Arc::clone(self),
                id: id.to_string(),
            })
        } else {
            None
        }
    }

    /// Recording context for the current session, if one exists.
    pub fn current_context(self: &Arc<Self>) -> Option<SessionContext> {
        let id = self.current_id()?;
        self.context(&id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Explicit handle that ties one execution to one session.
///
/// The executor records into whatever context it is handed; there is no
/// ambient current-session lookup inside the engine.
#[derive(Debug, Clone)]
pub struct SessionContext {
    store: Arc<SessionStore>,
    id: String,
}

impl SessionContext {
    /// Id of the session this context records into.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Record one completed exchange.
    pub fn append(&self, prompt: impl Into<String>, response: impl Into<String>) {
        self.store.append(&self.id, HistoryEntry::now(prompt, response));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_yields_distinct_ids_and_moves_current() {
        let store = SessionStore::new();
        let first = store.create();
        let second = store.create();

        assert_ne!(first, second);
        assert_eq!(store.current_id(), Some(second.clone()));

        let summaries = store.list();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, first);
        assert_eq!(summaries[1].id, second);
    }

    #[test]
    fn test_no_current_before_first_create() {
        let store = SessionStore::new();
        assert_eq!(store.current_id(), None);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_append_records_entry_and_bumps_activity() {
        let store = SessionStore::new();
        let id = store.create();
        let created_at = store.get(&id).unwrap().last_activity;

        store.append(&id, HistoryEntry::now("2+2=", "4"));

        let session = store.get(&id).unwrap();
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].prompt, "2+2=");
        assert_eq!(session.history[0].response, "4");
        assert!(session.last_activity >= created_at);

        let summary = &store.list()[0];
        assert_eq!(summary.message_count, 1);
    }

    #[test]
    fn test_append_preserves_order() {
        let store = SessionStore::new();
        let id = store.create();

        for i in 0..5 {
            store.append(&id, HistoryEntry::now(format!("p{i}"), format!("r{i}")));
        }

        let history = store.get(&id).unwrap().history;
        let prompts: Vec<&str> = history.iter().map(|e| e.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["p0", "p1", "p2", "p3", "p4"]);
    }

    #[test]
    fn test_append_to_unknown_id_is_noop() {
        let store = SessionStore::new();
        store.create();
        store.append("no-such-session", HistoryEntry::now("p", "r"));
        assert_eq!(store.list()[0].message_count, 0);
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let store = SessionStore::new();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_context_requires_existing_session() {
        let store = Arc::new(SessionStore::new());
        assert!(store.context("missing").is_none());

        let id = store.create();
        let ctx = store.context(&id).unwrap();
        assert_eq!(ctx.id(), id);
    }

    #[test]
    fn test_current_context_follows_latest_session() {
        let store = Arc::new(SessionStore::new());
        assert!(store.current_context().is_none());

        store.create();
        let second = store.create();
        let ctx = store.current_context().unwrap();
        assert_eq!(ctx.id(), second);
    }

    #[test]
    fn test_context_append_reaches_store() {
        let store = Arc::new(SessionStore::new());
        let id = store.create();
        let ctx = store.context(&id).unwrap();

        ctx.append("hello", "world");

        let session = store.get(&id).unwrap();
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].response, "world");
    }

    #[test]
    fn test_sessions_never_removed() {
        let store = SessionStore::new();
        for _ in 0..10 {
            store.create();
        }
        assert_eq!(store.list().len(), 10);
    }
}
