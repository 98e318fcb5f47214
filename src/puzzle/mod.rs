//! Puzzle definitions and the tournament folder they live in

pub mod definition;
mod tournament;

pub use definition::{
    decode, definitions_match, encode, replace_author, DefinitionError, PuzzleDocument,
};
pub use tournament::{PuzzleFile, Tournament, TournamentError, SOLUTIONS_FILENAME};
