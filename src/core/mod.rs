//! Core module shared by every command.
//!
//! - `ToolCore`: configuration, the tournament folder and access to the
//!   game's save files
//! - `services`: the operations behind the CLI commands

pub mod services;
mod tool_core;

pub use tool_core::{SaveFile, ToolCore, SAVE_TEMPLATE_FILENAME};
