//! Session hosting: the command surface around the rules engine.
//!
//! - `game`: `GameSession`, the lobby/play/reset lifecycle
//! - `shared`: `SharedSession`, single-writer access from many threads
//! - `snapshot`: read-only views handed to callers and observers
//! - `observer`: broadcast sinks
//! - `persistence`: versioned saves and the game history

pub mod game;
pub mod observer;
pub mod persistence;
pub mod shared;
pub mod snapshot;

pub use game::{CommandResult, GameSession};
pub use observer::{BroadcastError, ChannelObserver, GameObserver, LogObserver, SessionUpdate};
pub use persistence::{
    migrate, GameOutcome, GameStatus, JsonFileStore, MemoryStore, PersistError, PersistenceGateway, SaveData,
    SAVE_VERSION,
};
pub use shared::SharedSession;
pub use snapshot::{GameSnapshot, PlayerStatus, PlayerView, PropertyView};
