//! Save/load of game sessions.
//!
//! The engine calls a `PersistenceGateway` after each committed change and
//! never the other way round. Saves are versioned; `migrate` upgrades
//! older layouts on load.
//!
//! ## Layouts
//!
//! - v1: `{game_id, timestamp, state}`
//! - v2: adds `version` and the derived `snapshot`

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::{GameState, RulesConfig};

use super::snapshot::GameSnapshot;

/// Version number for the save format (increment when the layout changes).
pub const SAVE_VERSION: u32 = 2;

const CURRENT_FILE: &str = "current_game.json";
const HISTORY_FILE: &str = "game_history.jsonl";

/// Errors that can occur during save/load.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Save version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Store lock poisoned")]
    Poisoned,
}

/// The current game as written after every committed change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub game_id: String,
    pub timestamp: DateTime<Utc>,
    pub state: GameState,
    pub snapshot: GameSnapshot,
}

impl SaveData {
    #[must_use]
    pub fn new(game_id: impl Into<String>, state: &GameState, snapshot: GameSnapshot) -> Self {
        Self {
            version: SAVE_VERSION,
            game_id: game_id.into(),
            timestamp: Utc::now(),
            state: state.clone(),
            snapshot,
        }
    }
}

/// v1 layout.
#[derive(Deserialize)]
struct LegacySave {
    game_id: String,
    timestamp: DateTime<Utc>,
    state: GameState,
}

/// Upgrade a raw save of any known version to the current layout.
pub fn migrate(value: Value) -> Result<SaveData, PersistError> {
    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .map_or(1, |v| u32::try_from(v).unwrap_or(u32::MAX));

    if version > SAVE_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: version,
            supported: SAVE_VERSION,
        });
    }

    match version {
        1 => {
            let legacy: LegacySave = serde_json::from_value(value)?;
            log::info!("migrating save {} from v1", legacy.game_id);
            let snapshot = GameSnapshot::capture(&legacy.state, RulesConfig::default().snapshot_messages);
            Ok(SaveData {
                version: SAVE_VERSION,
                game_id: legacy.game_id,
                timestamp: legacy.timestamp,
                state: legacy.state,
                snapshot,
            })
        }
        _ => Ok(serde_json::from_value(value)?),
    }
}

/// How a recorded game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Completed,
    Reset,
}

/// One entry of the append-only game history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub game_id: String,
    pub timestamp: DateTime<Utc>,
    pub total_turns: u32,
    pub winner: Option<String>,
    pub status: GameStatus,
    pub final_state: GameSnapshot,
}

/// Storage backend for sessions.
pub trait PersistenceGateway: Send {
    /// Overwrite the current game.
    fn save(&mut self, data: &SaveData) -> Result<(), PersistError>;

    /// Append a finished or abandoned game to the history.
    fn append_history(&mut self, outcome: &GameOutcome) -> Result<(), PersistError>;

    /// The current game, migrated to the latest layout.
    fn load_latest(&self) -> Result<Option<SaveData>, PersistError>;

    /// Forget the current game. History is kept.
    fn clear_current(&mut self) -> Result<(), PersistError>;
}

// === In-memory store ===

#[derive(Debug, Default)]
struct MemoryInner {
    current: Option<Value>,
    history: Vec<GameOutcome>,
}

/// In-memory store. Clones share the same storage, so a caller can keep a
/// handle after moving one into a session.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw save, e.g. one written by an older version.
    pub fn put_raw(&self, value: Value) -> Result<(), PersistError> {
        self.lock()?.current = Some(value);
        Ok(())
    }

    pub fn history(&self) -> Result<Vec<GameOutcome>, PersistError> {
        Ok(self.lock()?.history.clone())
    }

    pub fn has_current(&self) -> Result<bool, PersistError> {
        Ok(self.lock()?.current.is_some())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, PersistError> {
        self.inner.lock().map_err(|_| PersistError::Poisoned)
    }
}

impl PersistenceGateway for MemoryStore {
    fn save(&mut self, data: &SaveData) -> Result<(), PersistError> {
        let value = serde_json::to_value(data)?;
        self.lock()?.current = Some(value);
        Ok(())
    }

    fn append_history(&mut self, outcome: &GameOutcome) -> Result<(), PersistError> {
        self.lock()?.history.push(outcome.clone());
        Ok(())
    }

    fn load_latest(&self) -> Result<Option<SaveData>, PersistError> {
        let current = self.lock()?.current.clone();
        current.map(migrate).transpose()
    }

    fn clear_current(&mut self) -> Result<(), PersistError> {
        self.lock()?.current = None;
        Ok(())
    }
}

// === JSON file store ===

/// Directory-backed store: `current_game.json` plus an append-only
/// `game_history.jsonl`.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) the store directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PersistError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    /// Every recorded outcome, oldest first. Unreadable lines are skipped.
    pub fn history(&self) -> Result<Vec<GameOutcome>, PersistError> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(fs::File::open(path)?);
        let mut outcomes = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => log::warn!("skipping unreadable history line: {}", e),
            }
        }
        Ok(outcomes)
    }
}

impl PersistenceGateway for JsonFileStore {
    fn save(&mut self, data: &SaveData) -> Result<(), PersistError> {
        let path = self.current_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(data)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn append_history(&mut self, outcome: &GameOutcome) -> Result<(), PersistError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.history_path())?;
        let line = serde_json::to_string(outcome)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        Ok(())
    }

    fn load_latest(&self) -> Result<Option<SaveData>, PersistError> {
        let path = self.current_path();
        if !path.exists() {
            return Ok(None);
        }
        let value: Value = serde_json::from_slice(&fs::read(path)?)?;
        migrate(value).map(Some)
    }

    fn clear_current(&mut self) -> Result<(), PersistError> {
        match fs::remove_file(self.current_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
