//! Tournament folder layout
//!
//! The working directory holds one subdirectory per round. A round contains
//! `<puzzle>.puzzle` definitions, optional `<puzzle>.images` reactor image
//! definitions, `solutions.txt` for import and the `exported*.txt` files this
//! tool writes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const PUZZLE_EXTENSION: &str = "puzzle";
pub const IMAGES_EXTENSION: &str = "images";
pub const SOLUTIONS_FILENAME: &str = "solutions.txt";

#[derive(Error, Debug)]
pub enum TournamentError {
    #[error("Unable to find a round containing puzzle '{0}'")]
    RoundNotFound(String),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A `.puzzle` file inside a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleFile {
    pub name: String,
    pub path: PathBuf,
}

impl PuzzleFile {
    /// Base64 definition stored in the file.
    pub fn read_definition(&self) -> Result<String, TournamentError> {
        read_to_string(&self.path)
    }
}

#[derive(Debug, Clone)]
pub struct Tournament {
    root: PathBuf,
}

impl Tournament {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn round_dir(&self, round: &str) -> PathBuf {
        self.root.join(round)
    }

    pub fn is_round(&self, name: &str) -> bool {
        self.round_dir(name).is_dir()
    }

    /// Name of the first round (in name order) holding `<puzzle>.puzzle`.
    pub fn find_round(&self, puzzle: &str) -> Result<String, TournamentError> {
        println!("Searching for round containing {}", puzzle);
        let filename = format!("{}.{}", puzzle, PUZZLE_EXTENSION);

        for round in sorted_entries(&self.root)?.into_iter().filter(|p| p.is_dir()) {
            let found = round.join(&filename).is_file();
            let name = file_name(&round);
            println!("  Round {} - {}", name, if found { "found" } else { "no" });
            if found {
                return Ok(name);
            }
        }
        Err(TournamentError::RoundNotFound(puzzle.to_string()))
    }

    /// Directory of the round holding `puzzle`.
    pub fn puzzle_round_dir(&self, puzzle: &str) -> Result<PathBuf, TournamentError> {
        Ok(self.round_dir(&self.find_round(puzzle)?))
    }

    pub fn puzzle(&self, round_dir: &Path, name: &str) -> PuzzleFile {
        PuzzleFile {
            name: name.to_string(),
            path: round_dir.join(format!("{}.{}", name, PUZZLE_EXTENSION)),
        }
    }

    /// Every `.puzzle` file of a round, sorted by name.
    pub fn puzzles_in(&self, round_dir: &Path) -> Result<Vec<PuzzleFile>, TournamentError> {
        Ok(sorted_entries(round_dir)?
            .into_iter()
            .filter(|p| p.is_file() && has_extension(p, PUZZLE_EXTENSION))
            .filter_map(|path| {
                let name = path.file_stem()?.to_string_lossy().to_string();
                Some(PuzzleFile { name, path })
            })
            .collect())
    }

    pub fn has_images(&self, round_dir: &Path, puzzle: &str) -> bool {
        round_dir
            .join(format!("{}.{}", puzzle, IMAGES_EXTENSION))
            .is_file()
    }

    /// Lines of the `.images` file for a puzzle, searched across rounds.
    pub fn image_definition(&self, puzzle: &str) -> Result<Vec<String>, TournamentError> {
        let path = self
            .puzzle_round_dir(puzzle)?
            .join(format!("{}.{}", puzzle, IMAGES_EXTENSION));
        println!("Loading image definition from {}", path.display());
        Ok(read_to_string(&path)?
            .lines()
            .map(str::to_string)
            .collect())
    }

    pub fn solutions_path(&self, round: &str) -> PathBuf {
        self.round_dir(round).join(SOLUTIONS_FILENAME)
    }

    /// First unused `exportedNNN.txt` (or `exported_<puzzle>NNN.txt`) in a
    /// round directory.
    pub fn next_export_path(&self, round_dir: &Path, puzzle: Option<&str>) -> PathBuf {
        let prefix = match puzzle {
            Some(puzzle) => format!("exported_{}", puzzle),
            None => "exported".to_string(),
        };
        (0..)
            .map(|n| round_dir.join(format!("{}{:03}.txt", prefix, n)))
            .find(|path| !path.exists())
            .unwrap_or_else(|| round_dir.join(format!("{}.txt", prefix)))
    }
}

fn read_to_string(path: &Path) -> Result<String, TournamentError> {
    fs::read_to_string(path).map_err(|source| TournamentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, TournamentError> {
    let io_err = |source| TournamentError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort();
    Ok(entries)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
