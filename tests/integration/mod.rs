//! Integration tests for schem
//!
//! These tests drive the services against real SQLite save files in a temp
//! directory.

#[path = "../common/mod.rs"]
pub mod common;

pub mod cli;
pub mod copy_flow;
pub mod export_import;
