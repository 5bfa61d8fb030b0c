//! Thread-safe session handle.
//!
//! Commands serialize on one mutex, so actions from concurrent
//! connections never interleave. Readers take the last published
//! snapshot without touching the writer lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::core::{ActionKind, ActionParams, GameError};

use super::game::{CommandResult, GameSession};
use super::snapshot::{GameSnapshot, PlayerStatus};

/// A `GameSession` shared between threads.
pub struct SharedSession {
    session: Mutex<GameSession>,
    latest: RwLock<Arc<GameSnapshot>>,
}

impl SharedSession {
    #[must_use]
    pub fn new(session: GameSession) -> Self {
        let latest = Arc::new(session.get_state());
        Self {
            session: Mutex::new(session),
            latest: RwLock::new(latest),
        }
    }

    /// The snapshot published by the last command.
    #[must_use]
    pub fn snapshot(&self) -> Arc<GameSnapshot> {
        Arc::clone(&self.latest.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn register_player(&self, name: &str) -> Result<CommandResult, GameError> {
        self.write(|session| session.register_player(name))
    }

    pub fn start_game(&self) -> Result<CommandResult, GameError> {
        self.write(GameSession::start_game)
    }

    pub fn action(&self, player: &str, action: &str, params: &ActionParams) -> Result<CommandResult, GameError> {
        self.write(|session| session.action(player, action, params))
    }

    pub fn reset_game(&self) -> Arc<GameSnapshot> {
        let mut session = self.lock();
        let snapshot = session.reset_game();
        self.publish(&snapshot);
        snapshot
    }

    pub fn legal_actions(&self, player: &str) -> Result<Vec<ActionKind>, GameError> {
        self.lock().legal_actions(player)
    }

    pub fn player_status(&self, player: &str) -> Result<PlayerStatus, GameError> {
        self.lock().player_status(player)
    }

    /// Run `f` with exclusive access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut GameSession) -> R) -> R {
        let mut session = self.lock();
        let result = f(&mut session);
        self.publish(&Arc::new(session.get_state()));
        result
    }

    // State only changes by whole committed actions, so a panic in another
    // holder cannot leave it half-applied.
    fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(
        &self,
        f: impl FnOnce(&mut GameSession) -> Result<CommandResult, GameError>,
    ) -> Result<CommandResult, GameError> {
        let mut session = self.lock();
        let result = f(&mut session)?;
        self.publish(&result.snapshot);
        Ok(result)
    }

    fn publish(&self, snapshot: &Arc<GameSnapshot>) {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(snapshot);
    }
}
