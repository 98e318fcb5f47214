//! Access to the game's SQLite files
//!
//! A `<user>.user` save file holds custom levels (ResearchNet, Level) and
//! the components of each level's solution. `.locals` lists the game users.

mod database;
mod level;
mod models;
pub mod schema;
mod solution;
mod user;

pub use database::{Database, DatabaseError};
pub use level::{ticks, LevelIds, LevelStore};
pub use models::{LevelAttempt, User};
pub use solution::{ImportContext, SolutionStore};
pub use user::UserStore;
