//! Solution record model and analysis
//!
//! - `layer`: packed waldo/lane field of an instruction
//! - `record`: the `SOLUTION`/`COMPONENT`/`MEMBER`/`PIPE`/`ANNOTATION` lines
//! - `builder`: assembles a record from store rows
//! - `waldopath`: reachable-cell coverage of the waldos
//! - `filter`: completion classification and stats filters

mod builder;
mod filter;
mod layer;
mod record;
mod stats;
mod waldopath;

pub use builder::{BuiltSolution, SolutionRecordBuilder};
pub use filter::{
    CompletionStats, CyclesFilter, FilterError, LiveCounts, Selection, StatFilter, StatsFilter,
};
pub use layer::{Layer, Waldo};
pub use record::{
    body_lines, parse_records, Annotation, Component, ComponentBlock, Member, Pipe, RecordError,
    RecordLine, SolutionHeader, SolutionRecord,
};
pub use stats::{ExtendedStats, COUNTED_INSTRUCTIONS};
pub use waldopath::{reactor_coverage, waldo_path, Coverage, Heading, WaldoPathError};
