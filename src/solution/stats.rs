//! Extended statistics: instruction counts and waldopath

use std::fmt;

use super::record::ComponentBlock;
use super::waldopath::{waldo_path, WaldoPathError};

/// Instruction types reported by the `stats` command, in display order.
pub const COUNTED_INSTRUCTIONS: [&str; 12] = [
    "instr-arrow",
    "instr-grab",
    "instr-fuse",
    "instr-split",
    "instr-input",
    "instr-output",
    "instr-swap",
    "instr-sync",
    "instr-toggle",
    "instr-rotate",
    "instr-bond",
    "instr-sensor",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedStats {
    pub instructions: Vec<(&'static str, usize)>,
    pub waldopath: usize,
}

impl ExtendedStats {
    pub fn of(components: &[ComponentBlock]) -> Result<Self, WaldoPathError> {
        let instructions = COUNTED_INSTRUCTIONS
            .iter()
            .map(|&kind| {
                let count = components
                    .iter()
                    .flat_map(|block| &block.members)
                    .filter(|m| m.kind == kind)
                    .count();
                (kind, count)
            })
            .collect();

        Ok(Self {
            instructions,
            waldopath: waldo_path(components)?,
        })
    }

    pub fn count(&self, kind: &str) -> Option<usize> {
        self.instructions
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, count)| *count)
    }
}

impl fmt::Display for ExtendedStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, count) in &self.instructions {
            writeln!(f, "      {:<15} {}", kind, count)?;
        }
        write!(f, "      {:<15} {}", "waldopath", self.waldopath)
    }
}
