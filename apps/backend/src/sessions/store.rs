//! Owner of every live [`GameSession`].
//!
//! Each session sits behind its own async mutex, so guesses for one
//! session are serialised while different sessions never contend. Activity
//! time is tracked outside that mutex; the sweeper reads it without waiting
//! on a guess that is mid-judgment. Readers get a [`SessionView`] published
//! after each guess, so they never wait on the mutex either.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{GameSession, Persona, SessionId};
use crate::errors::domain::DomainError;

/// Last published state of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub current_word: String,
    pub history: Vec<String>,
    pub score: u32,
    pub game_over: bool,
}

impl SessionView {
    fn of(session: &GameSession) -> Self {
        Self {
            current_word: session.current_word().to_string(),
            history: session.history().to_vec(),
            score: session.score(),
            game_over: session.is_over(),
        }
    }
}

struct Slot {
    session: AsyncMutex<GameSession>,
    view: RwLock<SessionView>,
    last_activity: Mutex<Instant>,
}

impl Slot {
    fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_activity.lock())
    }
}

/// Access to one session, obtained from [`SessionStore::get`].
///
/// Holding a handle does not keep the session registered: once evicted,
/// later lookups by id fail even while an older handle is still in use.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    slot: Arc<Slot>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Exclusive access for a validate/apply sequence. Call [`publish`]
    /// before releasing the guard once the session changed.
    ///
    /// [`publish`]: SessionHandle::publish
    pub async fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.slot.session.lock().await
    }

    pub fn publish(&self, session: &GameSession) {
        *self.slot.view.write() = SessionView::of(session);
    }

    /// Never waits on a guess in progress.
    pub fn view(&self) -> SessionView {
        self.slot.view.read().clone()
    }

    pub fn touch(&self) {
        self.slot.touch();
    }
}

pub struct SessionStore {
    sessions: DashMap<SessionId, Arc<Slot>>,
    start_word: String,
}

impl SessionStore {
    pub fn new(start_word: impl Into<String>) -> Self {
        Self {
            sessions: DashMap::new(),
            start_word: start_word.into(),
        }
    }

    pub fn create(&self, persona: Persona) -> SessionHandle {
        let id = SessionId::generate();
        let session = GameSession::start(id, &self.start_word, persona);
        let slot = Arc::new(Slot {
            view: RwLock::new(SessionView::of(&session)),
            session: AsyncMutex::new(session),
            last_activity: Mutex::new(Instant::now()),
        });
        self.sessions.insert(id, Arc::clone(&slot));
        debug!(session_id = %id, persona = %persona, "Session created");
        SessionHandle { id, slot }
    }

    pub fn get(&self, id: SessionId) -> Result<SessionHandle, DomainError> {
        self.sessions
            .get(&id)
            .map(|slot| SessionHandle {
                id,
                slot: Arc::clone(slot.value()),
            })
            .ok_or_else(|| DomainError::session_not_found(id))
    }

    /// Returns `false` when the session is gone.
    pub fn touch(&self, id: SessionId) -> bool {
        match self.sessions.get(&id) {
            Some(slot) => {
                slot.touch();
                true
            }
            None => false,
        }
    }

    /// Drop sessions idle for longer than `max_idle`. Returns how many went.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, slot| slot.idle_for(now) <= max_idle);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
