use crate::games::game::{Game, HistoryRecord};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const ACTIVE_GAMES_KEY: &str = "activeGames";
pub const GAME_HISTORY_KEY: &str = "gameHistory";

/// Storage for the two game sequences. Loads never fail: unreadable data is
/// treated as an empty sequence.
pub trait GameStore: Send + Sync {
    fn load_games(&self) -> Vec<Game>;

    fn save_games(&self, games: &[Game]) -> Result<(), String>;

    fn load_history(&self) -> Vec<HistoryRecord>;

    fn append_history(&self, record: HistoryRecord) -> Result<(), String>;

    fn clear_history(&self) -> Result<(), String>;
}

/// Keeps each key in `<dir>/<key>.json`.
pub struct FlatFileGameStore {
    dir: PathBuf,
}

impl FlatFileGameStore {
    pub fn new(dir: impl Into<PathBuf>) -> FlatFileGameStore {
        FlatFileGameStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_sequence<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let path = self.path_for(key);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored '{}' yet at {}", key, path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to open '{}' at {}: {}", key, path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(values) => values,
            Err(e) => {
                warn!("Stored '{}' is malformed, treating it as empty: {}", key, e);
                Vec::new()
            }
        }
    }

    fn write_sequence<T: Serialize>(&self, key: &str, values: &[T]) -> Result<(), String> {
        fs::create_dir_all(&self.dir)
            .map_err(|x| format!("Failed to create {}: {}", self.dir.display(), x))?;

        let path = self.path_for(key);
        let file = File::create(&path)
            .map_err(|x| format!("Failed to write {}: {}", path.display(), x))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, values).map_err(|x| format!("{:?}", x))?;
        writer.flush().map_err(|x| x.to_string())?;

        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl GameStore for FlatFileGameStore {
    fn load_games(&self) -> Vec<Game> {
        self.read_sequence(ACTIVE_GAMES_KEY)
    }

    fn save_games(&self, games: &[Game]) -> Result<(), String> {
        self.write_sequence(ACTIVE_GAMES_KEY, games)
    }

    fn load_history(&self) -> Vec<HistoryRecord> {
        self.read_sequence(GAME_HISTORY_KEY)
    }

    fn append_history(&self, record: HistoryRecord) -> Result<(), String> {
        let mut history = self.load_history();
        history.push(record);

        self.write_sequence(GAME_HISTORY_KEY, &history)
    }

    fn clear_history(&self) -> Result<(), String> {
        match fs::remove_file(self.path_for(GAME_HISTORY_KEY)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// In-process store, used by tests and when no data directory is wanted.
#[derive(Default)]
pub struct MemoryGameStore {
    games: Mutex<Vec<Game>>,
    history: Mutex<Vec<HistoryRecord>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryGameStore {
    fn load_games(&self) -> Vec<Game> {
        self.games.lock().map(|x| x.clone()).unwrap_or_default()
    }

    fn save_games(&self, games: &[Game]) -> Result<(), String> {
        let mut stored = self.games.lock().map_err(|x| x.to_string())?;
        *stored = games.to_vec();

        Ok(())
    }

    fn load_history(&self) -> Vec<HistoryRecord> {
        self.history.lock().map(|x| x.clone()).unwrap_or_default()
    }

    fn append_history(&self, record: HistoryRecord) -> Result<(), String> {
        self.history
            .lock()
            .map_err(|x| x.to_string())?
            .push(record);

        Ok(())
    }

    fn clear_history(&self) -> Result<(), String> {
        self.history.lock().map_err(|x| x.to_string())?.clear();

        Ok(())
    }
}
