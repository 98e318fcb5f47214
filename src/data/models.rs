//! Rows read from the save files

use crate::solution::CompletionStats;

/// A custom level together with the stats the game recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelAttempt {
    pub id: String,
    pub stats: CompletionStats,
    /// Encoded puzzle definition from ResearchNet
    pub definition: String,
}

/// A game user listed in `.locals`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub save_file: String,
    pub last_played: Option<String>,
}

impl User {
    /// Save file name the tool expects for a user it manages.
    pub fn expected_save_file(name: &str) -> String {
        format!("{}.user", name)
    }

    pub fn is_managed(&self) -> bool {
        self.save_file == Self::expected_save_file(&self.name)
    }
}
