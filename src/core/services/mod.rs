//! Operations behind the CLI commands

pub mod diagnose_service;
pub mod error;
pub mod image_service;
pub mod puzzle_service;
pub mod solution_service;
pub mod user_service;

pub use diagnose_service::{Check, DiagnoseReport, DiagnoseService};
pub use error::ServiceError;
pub use image_service::ImageService;
pub use puzzle_service::PuzzleService;
pub use solution_service::{CopyOutcome, ExportSummary, ReadOptions, SolutionService};
pub use user_service::{SaveFileStatus, UserService};
