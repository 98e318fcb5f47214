pub mod config;
pub mod core;
pub mod data;
pub mod images;
pub mod puzzle;
pub mod solution;
pub mod util;

pub use config::Config;
pub use core::ToolCore;
pub use data::{Database, LevelStore, SolutionStore, UserStore};
pub use puzzle::{definitions_match, PuzzleDocument, Tournament};
pub use solution::{
    parse_records, waldo_path, Layer, SolutionRecord, SolutionRecordBuilder, StatsFilter, Waldo,
};
