//! High-score persistence.
//!
//! The only durable state is one integer stored under
//! [`HIGH_SCORE_KEY`](crate::constants::HIGH_SCORE_KEY).  Storage is a small
//! string key/value abstraction ([`ScoreStorage`]) with two backends:
//!
//! | Backend              | Used for                                   |
//! |----------------------|--------------------------------------------|
//! | [`TomlFileStorage`]  | the game: `saves/high_scores.toml`         |
//! | [`MemoryStorage`]    | tests, and as the fallback when no file can be used |
//!
//! [`HighScoreStore`] sits on top and never fails: unreadable storage reads
//! as 0, a malformed value reads as 0, and a failed write drops the backend
//! for the rest of the session while the value stays cached in memory.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::GameConfig;
use crate::constants::HIGH_SCORE_KEY;
use crate::error::{GameError, GameResult};
use bevy::prelude::*;

// ── Storage backends ──────────────────────────────────────────────────────────

/// Durable string key/value storage.
pub trait ScoreStorage: Send + Sync {
    /// `Ok(None)` when the key has never been written.
    fn read(&self, key: &str) -> GameResult<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> GameResult<()>;
}

/// A TOML file holding a flat table of `key = "value"` pairs.
#[derive(Debug, Clone)]
pub struct TomlFileStorage {
    path: PathBuf,
}

impl TomlFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, operation: &'static str, reason: impl ToString) -> GameError {
        GameError::StorageUnavailable {
            operation,
            location: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Current table, or an empty one when the file does not exist yet.
    fn load_table(&self) -> GameResult<toml::Table> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents
                .parse::<toml::Table>()
                .map_err(|err| self.unavailable("read", err)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(toml::Table::new()),
            Err(err) => Err(self.unavailable("read", err)),
        }
    }
}

impl ScoreStorage for TomlFileStorage {
    fn read(&self, key: &str) -> GameResult<Option<String>> {
        let table = self.load_table()?;
        Ok(table.get(key).map(|value| match value {
            toml::Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    fn write(&mut self, key: &str, value: &str) -> GameResult<()> {
        // A corrupt file is replaced rather than blocking every future save.
        let mut table = self.load_table().unwrap_or_default();
        table.insert(key.to_string(), toml::Value::String(value.to_string()));

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| self.unavailable("create dir", err))?;
        }
        let serialized =
            toml::to_string_pretty(&table).map_err(|err| self.unavailable("write", err))?;
        fs::write(&self.path, serialized).map_err(|err| self.unavailable("write", err))
    }
}

/// Process-local storage.  `unavailable()` builds one that rejects every
/// operation, for exercising the degraded paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    broken: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            broken: true,
        }
    }

    /// Seed a raw value, bypassing validation.
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    fn check(&self, operation: &'static str) -> GameResult<()> {
        if self.broken {
            return Err(GameError::StorageUnavailable {
                operation,
                location: "memory".to_string(),
                reason: "storage disabled".to_string(),
            });
        }
        Ok(())
    }
}

impl ScoreStorage for MemoryStorage {
    fn read(&self, key: &str) -> GameResult<Option<String>> {
        self.check("read")?;
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.check("write")?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ── High-score store ──────────────────────────────────────────────────────────

/// Parse a stored score.  Surrounding whitespace is tolerated; anything else
/// that is not a non-negative integer is rejected.
pub fn parse_score(key: &str, raw: &str) -> GameResult<u32> {
    raw.trim().parse::<u32>().map_err(|_| GameError::MalformedScore {
        key: key.to_string(),
        raw: raw.to_string(),
    })
}

/// Load/save facade for the high score.  Never fails.
#[derive(Resource)]
pub struct HighScoreStore {
    backend: Option<Box<dyn ScoreStorage>>,
    /// Last value loaded or saved; answers reads once the backend is gone.
    cached: u32,
}

impl Default for HighScoreStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl HighScoreStore {
    pub fn new(backend: impl ScoreStorage + 'static) -> Self {
        Self {
            backend: Some(Box::new(backend)),
            cached: 0,
        }
    }

    /// A store that only lives as long as the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Best score known this session, without touching storage.
    pub fn best(&self) -> u32 {
        self.cached
    }

    /// `true` while writes still reach a backend.
    pub fn is_durable(&self) -> bool {
        self.backend.is_some()
    }

    /// Read the stored high score; 0 if absent or unparsable.
    pub fn load(&mut self) -> u32 {
        let Some(backend) = self.backend.as_ref() else {
            return self.cached;
        };

        let loaded = match backend.read(HIGH_SCORE_KEY) {
            Ok(Some(raw)) => parse_score(HIGH_SCORE_KEY, &raw).unwrap_or_else(|err| {
                warn!("{err}; treating high score as 0");
                0
            }),
            Ok(None) => 0,
            Err(err) => {
                warn!("{err}; using in-memory high score");
                return self.cached;
            }
        };
        self.cached = loaded;
        loaded
    }

    /// Remember `value` and write it through.  A failed write disables the
    /// backend for the rest of the session.
    pub fn save(&mut self, value: u32) {
        self.cached = value;
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(err) = backend.write(HIGH_SCORE_KEY, &value.to_string()) {
            warn!("{err}; high score will only be kept in memory");
            self.backend = None;
        }
    }
}

/// Startup system: open the file-backed store named in [`GameConfig`].
///
/// Must run after config loading so an overridden path is honoured.
pub fn open_high_score_store(mut commands: Commands, config: Res<GameConfig>) {
    let storage = TomlFileStorage::new(&config.high_score_path);
    info!("High scores stored in {}", storage.path().display());
    let mut store = HighScoreStore::new(storage);
    let best = store.load();
    info!("Loaded high score {best}");
    commands.insert_resource(store);
}
