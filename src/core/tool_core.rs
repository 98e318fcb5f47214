//! Shared state for every command: configuration, the tournament folder and
//! access to the game's files.

use std::path::PathBuf;

use crate::config::Config;
use crate::data::{Database, DatabaseError, LevelStore, SolutionStore, UserStore};
use crate::puzzle::Tournament;
use crate::util::paths;

/// Template copied over missing or truncated save files.
pub const SAVE_TEMPLATE_FILENAME: &str = "new.user";

/// Core infrastructure for the tool.
///
/// Owns the configuration and the tournament folder; save files are opened
/// per command since each command works on a different game user.
pub struct ToolCore {
    config: Config,
    tournament: Tournament,
}

/// An open `<user>.user` save file and its stores.
pub struct SaveFile {
    /// Database connection (owned to keep connection alive)
    pub database: Database,
    pub levels: LevelStore,
    pub solutions: SolutionStore,
}

impl SaveFile {
    pub fn new(database: Database) -> Self {
        Self {
            levels: LevelStore::new(database.connection()),
            solutions: SolutionStore::new(database.connection()),
            database,
        }
    }
}

impl ToolCore {
    pub fn new(config: Config) -> Self {
        let tournament = Tournament::new(config.working_dir.clone());
        Self { config, tournament }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn locals_path(&self) -> PathBuf {
        paths::locals_path(&self.config.save_path)
    }

    pub fn save_dir(&self) -> PathBuf {
        paths::save_dir(&self.config.save_path)
    }

    pub fn save_file_path(&self, user: &str) -> PathBuf {
        paths::save_file_path(&self.config.save_path, user)
    }

    pub fn save_template_path(&self) -> PathBuf {
        self.config.working_dir.join(SAVE_TEMPLATE_FILENAME)
    }

    /// Open the save file of a game user.
    pub fn open_save(&self, user: &str) -> Result<SaveFile, DatabaseError> {
        Database::open(self.save_file_path(user)).map(SaveFile::new)
    }

    /// Open the game's user list.
    pub fn open_locals(&self) -> Result<UserStore, DatabaseError> {
        let database = Database::open(self.locals_path())?;
        Ok(UserStore::new(database.connection()))
    }
}
