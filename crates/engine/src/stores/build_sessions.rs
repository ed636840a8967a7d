//! Per-player build session store.
//!
//! Each live [`BuildSession`] is owned by its own tokio task. Callers never
//! touch the session directly: they send a closure through the session's
//! bounded mailbox and await the reply. Work for one player is therefore
//! applied strictly in arrival order while different players proceed in
//! parallel.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};

use charbldr_domain::{BuildSession, BuildSessionId};

use crate::infrastructure::config::EngineConfig;

type Job = Box<dyn FnOnce(&mut BuildSession) + Send>;

#[derive(Debug, thiserror::Error)]
pub enum BuildStoreError {
    #[error("No build session for player: {0}")]
    SessionNotFound(String),

    #[error("Build session limit reached ({0} live sessions)")]
    SessionLimit(usize),

    #[error("Build session for player {0} has shut down")]
    SessionClosed(String),
}

#[derive(Clone)]
struct SessionHandle {
    session_id: BuildSessionId,
    mailbox: mpsc::Sender<Job>,
}

/// Live build sessions keyed by player id.
pub struct BuildSessionStore {
    sessions: DashMap<String, SessionHandle>,
    /// Slots taken out of `max_sessions`, reserved before a vacant entry is filled
    live: AtomicUsize,
    mailbox_capacity: usize,
    max_sessions: usize,
}

impl BuildSessionStore {
    pub fn new(mailbox_capacity: usize, max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            live: AtomicUsize::new(0),
            mailbox_capacity: mailbox_capacity.max(1),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.mailbox_capacity, config.max_sessions)
    }

    /// Host `session`, replacing any session the same player already has.
    ///
    /// Must be called from within a tokio runtime.
    pub fn insert(&self, session: BuildSession) -> Result<BuildSessionId, BuildStoreError> {
        let player_id = session.player_id().to_string();
        let session_id = session.id();

        match self.sessions.entry(player_id.clone()) {
            Entry::Occupied(mut entry) => {
                let previous = entry.insert(self.spawn(session));
                tracing::info!(
                    player_id = %player_id,
                    session_id = %session_id,
                    replaced = %previous.session_id,
                    "Replaced build session"
                );
            }
            Entry::Vacant(entry) => {
                // The entry holds its shard lock, so the slot is reserved
                // before any other insert for this player can observe it
                if !self.reserve_slot() {
                    tracing::warn!(
                        player_id = %player_id,
                        max_sessions = self.max_sessions,
                        "Refusing build session, store is full"
                    );
                    return Err(BuildStoreError::SessionLimit(self.max_sessions));
                }
                entry.insert(self.spawn(session));
                tracing::info!(
                    player_id = %player_id,
                    session_id = %session_id,
                    "Started build session"
                );
            }
        }

        Ok(session_id)
    }

    fn reserve_slot(&self) -> bool {
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < self.max_sessions).then_some(live + 1)
            })
            .is_ok()
    }

    fn release_slot(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }

    fn spawn(&self, session: BuildSession) -> SessionHandle {
        let session_id = session.id();
        let (mailbox, inbox) = mpsc::channel(self.mailbox_capacity);
        tokio::spawn(run_session(session, inbox));
        SessionHandle {
            session_id,
            mailbox,
        }
    }

    /// Run `f` against the player's session and return its result.
    pub async fn with_session<R, F>(&self, player_id: &str, f: F) -> Result<R, BuildStoreError>
    where
        F: FnOnce(&mut BuildSession) -> R + Send + 'static,
        R: Send + 'static,
    {
        // Clone the sender so no map guard is held across the await
        let mailbox = self
            .sessions
            .get(player_id)
            .map(|handle| handle.mailbox.clone())
            .ok_or_else(|| BuildStoreError::SessionNotFound(player_id.to_string()))?;

        let (reply, response) = oneshot::channel();
        let job: Job = Box::new(move |session| {
            // The caller may have given up waiting; nothing to do then
            let _ = reply.send(f(session));
        });

        mailbox
            .send(job)
            .await
            .map_err(|_| BuildStoreError::SessionClosed(player_id.to_string()))?;
        response
            .await
            .map_err(|_| BuildStoreError::SessionClosed(player_id.to_string()))
    }

    /// Drop the player's session. Returns whether one existed.
    pub fn remove(&self, player_id: &str) -> bool {
        let removed = self.sessions.remove(player_id).is_some();
        if removed {
            self.release_slot();
            tracing::info!(player_id = %player_id, "Dropped build session");
        }
        removed
    }

    /// Drop the player's session only if it is still `session_id`.
    pub fn remove_if_session(&self, player_id: &str, session_id: BuildSessionId) -> bool {
        let removed = self
            .sessions
            .remove_if(player_id, |_, handle| handle.session_id == session_id)
            .is_some();
        if removed {
            self.release_slot();
            tracing::info!(
                player_id = %player_id,
                session_id = %session_id,
                "Dropped build session"
            );
        }
        removed
    }

    pub fn session_id(&self, player_id: &str) -> Option<BuildSessionId> {
        self.sessions.get(player_id).map(|handle| handle.session_id)
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.sessions.contains_key(player_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Owns one session until every sender is dropped.
async fn run_session(mut session: BuildSession, mut inbox: mpsc::Receiver<Job>) {
    let session_id = session.id();
    while let Some(job) = inbox.recv().await {
        job(&mut session);
    }
    tracing::debug!(
        session_id = %session_id,
        player_id = %session.player_id(),
        "Build session task finished"
    );
}
