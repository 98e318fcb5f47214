//! Line-oriented solution record
//!
//! A solutions file is a sequence of `KIND:args` lines. A `SOLUTION` line
//! opens a block, every `COMPONENT` line opens a component inside it, and the
//! `MEMBER`, `PIPE` and `ANNOTATION` lines that follow belong to that
//! component.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::layer::Layer;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("Invalid solution line '{0}'")]
    MissingSeparator(String),
    #[error("Unknown record kind '{kind}' in line '{line}'")]
    UnknownKind { kind: String, line: String },
    #[error("Invalid {kind} line '{line}': {reason}")]
    Malformed {
        kind: &'static str,
        line: String,
        reason: String,
    },
    #[error("Line '{0}' does not belong to any {1}")]
    Orphan(String, &'static str),
}

/// A placed component (reactor, input or output zone, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub kind: String,
    pub x: i64,
    pub y: i64,
    pub name: String,
}

impl Component {
    pub fn is_reactor(&self) -> bool {
        self.kind.ends_with("-reactor")
    }
}

/// An instruction or reactor feature placed on a component's grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub kind: String,
    pub arrow_dir: i64,
    pub choice: i64,
    pub layer: Layer,
    pub x: i64,
    pub y: i64,
    pub element_type: i64,
    pub element: i64,
}

impl Member {
    pub const START: &'static str = "instr-start";
    pub const ARROW: &'static str = "instr-arrow";
    pub const SENSOR: &'static str = "instr-sensor";
    pub const TOGGLE: &'static str = "instr-toggle";

    pub fn is_instruction(&self) -> bool {
        self.kind.starts_with("instr-")
    }

    pub fn is_start(&self) -> bool {
        self.kind == Self::START
    }

    pub fn is_arrow(&self) -> bool {
        self.kind == Self::ARROW
    }

    /// Sensors and flip-flops branch the waldo.
    pub fn is_switch(&self) -> bool {
        self.kind == Self::SENSOR || self.kind == Self::TOGGLE
    }

    /// Counts towards the symbol total shown by the game.
    pub fn is_symbol(&self) -> bool {
        self.layer.is_symbol() && !self.is_start()
    }

    pub fn with_swapped_waldo(mut self) -> Self {
        self.layer = self.layer.swap_waldo();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipe {
    pub output_id: i64,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub output_id: i64,
    pub expanded: bool,
    pub x: i64,
    pub y: i64,
    pub text: String,
}

/// Opening line of a solution block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionHeader {
    pub puzzle: String,
    pub solver: String,
    /// `cycles-reactors-symbols` or `Incomplete-reactors-symbols`
    pub stats: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLine {
    Solution(SolutionHeader),
    Component(Component),
    Member(Member),
    Pipe(Pipe),
    Annotation(Annotation),
}

impl fmt::Display for RecordLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordLine::Solution(h) => write!(f, "SOLUTION:{},{},{}", h.puzzle, h.solver, h.stats),
            RecordLine::Component(c) => write!(
                f,
                "COMPONENT:{},{},{},{}",
                quote(&c.kind),
                c.x,
                c.y,
                quote(&c.name)
            ),
            RecordLine::Member(m) => write!(
                f,
                "MEMBER:{},{},{},{},{},{},{},{}",
                quote(&m.kind),
                m.arrow_dir,
                m.choice,
                m.layer,
                m.x,
                m.y,
                m.element_type,
                m.element
            ),
            RecordLine::Pipe(p) => write!(f, "PIPE:{},{},{}", p.output_id, p.x, p.y),
            RecordLine::Annotation(a) => write!(
                f,
                "ANNOTATION:{},{},{},{},{}",
                a.output_id,
                a.expanded as i32,
                a.x,
                a.y,
                quote(&escape_newlines(&a.text))
            ),
        }
    }
}

impl FromStr for RecordLine {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (kind, args) = line
            .split_once(':')
            .ok_or_else(|| RecordError::MissingSeparator(line.to_string()))?;

        match kind {
            "SOLUTION" => {
                let mut parts = args.splitn(3, ',');
                let mut next = |what: &str| {
                    parts.next().map(str::to_string).ok_or_else(|| RecordError::Malformed {
                        kind: "SOLUTION",
                        line: line.to_string(),
                        reason: format!("missing {}", what),
                    })
                };
                Ok(RecordLine::Solution(SolutionHeader {
                    puzzle: next("puzzle name")?,
                    solver: next("solver name")?,
                    stats: next("stats")?,
                }))
            }
            "COMPONENT" => {
                let args = Args::parse("COMPONENT", line, args, 4)?;
                Ok(RecordLine::Component(Component {
                    kind: args.text(0)?,
                    x: args.int(1)?,
                    y: args.int(2)?,
                    name: args.text(3)?,
                }))
            }
            "MEMBER" => {
                let args = Args::parse("MEMBER", line, args, 8)?;
                Ok(RecordLine::Member(Member {
                    kind: args.text(0)?,
                    arrow_dir: args.int(1)?,
                    choice: args.int(2)?,
                    layer: Layer::new(args.int(3)?),
                    x: args.int(4)?,
                    y: args.int(5)?,
                    element_type: args.int(6)?,
                    element: args.int(7)?,
                }))
            }
            "PIPE" => {
                let args = Args::parse("PIPE", line, args, 3)?;
                Ok(RecordLine::Pipe(Pipe {
                    output_id: args.int(0)?,
                    x: args.int(1)?,
                    y: args.int(2)?,
                }))
            }
            "ANNOTATION" => {
                let args = Args::parse("ANNOTATION", line, args, 5)?;
                Ok(RecordLine::Annotation(Annotation {
                    output_id: args.int(0)?,
                    expanded: args.int(1)? != 0,
                    x: args.int(2)?,
                    y: args.int(3)?,
                    text: unescape_newlines(&args.text(4)?),
                }))
            }
            other => Err(RecordError::UnknownKind {
                kind: other.to_string(),
                line: line.to_string(),
            }),
        }
    }
}

/// One component and the records nested under it, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentBlock {
    pub component: Component,
    pub members: Vec<Member>,
    pub pipes: Vec<Pipe>,
    pub annotations: Vec<Annotation>,
}

impl ComponentBlock {
    pub fn new(component: Component) -> Self {
        Self {
            component,
            members: Vec::new(),
            pipes: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

/// A complete solution: header plus its components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionRecord {
    pub header: SolutionHeader,
    pub components: Vec<ComponentBlock>,
}

impl SolutionRecord {
    pub fn lines(&self) -> Vec<RecordLine> {
        let mut lines = vec![RecordLine::Solution(self.header.clone())];
        lines.extend(body_lines(&self.components));
        lines
    }

    pub fn to_text(&self) -> String {
        self.lines()
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }
}

/// Component, member, pipe and annotation lines in their nesting order.
pub fn body_lines(components: &[ComponentBlock]) -> Vec<RecordLine> {
    let mut lines = Vec::new();
    for block in components {
        lines.push(RecordLine::Component(block.component.clone()));
        lines.extend(block.members.iter().cloned().map(RecordLine::Member));
        lines.extend(block.pipes.iter().copied().map(RecordLine::Pipe));
        lines.extend(block.annotations.iter().cloned().map(RecordLine::Annotation));
    }
    lines
}

/// Parse a solutions file into its solution blocks.
///
/// Blank lines are ignored and unknown kinds are skipped. Everything else
/// must parse, so a bad line rejects the whole file before anything is
/// written.
pub fn parse_records(text: &str) -> Result<Vec<SolutionRecord>, RecordError> {
    let mut records: Vec<SolutionRecord> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let parsed = match line.parse::<RecordLine>() {
            Ok(parsed) => parsed,
            Err(RecordError::UnknownKind { kind, .. }) => {
                tracing::warn!(kind = %kind, line = %line, "Skipping unknown solution line");
                continue;
            }
            Err(e) => return Err(e),
        };

        match parsed {
            RecordLine::Solution(header) => records.push(SolutionRecord {
                header,
                components: Vec::new(),
            }),
            RecordLine::Component(component) => current_record(&mut records, line)?
                .components
                .push(ComponentBlock::new(component)),
            RecordLine::Member(m) => current_block(&mut records, line)?.members.push(m),
            RecordLine::Pipe(p) => current_block(&mut records, line)?.pipes.push(p),
            RecordLine::Annotation(a) => current_block(&mut records, line)?.annotations.push(a),
        }
    }

    Ok(records)
}

fn current_record<'r>(
    records: &'r mut [SolutionRecord],
    line: &str,
) -> Result<&'r mut SolutionRecord, RecordError> {
    records
        .last_mut()
        .ok_or_else(|| RecordError::Orphan(line.to_string(), "SOLUTION"))
}

fn current_block<'r>(
    records: &'r mut [SolutionRecord],
    line: &str,
) -> Result<&'r mut ComponentBlock, RecordError> {
    current_record(records, line)?
        .components
        .last_mut()
        .ok_or_else(|| RecordError::Orphan(line.to_string(), "COMPONENT"))
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn escape_newlines(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Inverse of `escape_newlines`. Unknown escapes are kept as written.
fn unescape_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

enum Arg {
    Quoted(String),
    Bare(String),
}

/// Comma separated arguments where strings are single quoted.
struct Args<'a> {
    kind: &'static str,
    line: &'a str,
    values: Vec<Arg>,
}

impl<'a> Args<'a> {
    fn parse(
        kind: &'static str,
        line: &'a str,
        args: &str,
        expected: usize,
    ) -> Result<Self, RecordError> {
        let mut values = Vec::new();
        let mut chars = args.chars().peekable();

        loop {
            if chars.peek() == Some(&'\'') {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('\'') if chars.peek() == Some(&'\'') => {
                            chars.next();
                            text.push('\'');
                        }
                        Some('\'') => break,
                        Some(c) => text.push(c),
                        None => {
                            return Err(Self::error(kind, line, "unterminated string".into()));
                        }
                    }
                }
                values.push(Arg::Quoted(text));
                match chars.next() {
                    None => break,
                    Some(',') => continue,
                    Some(c) => {
                        return Err(Self::error(
                            kind,
                            line,
                            format!("unexpected '{}' after string", c),
                        ));
                    }
                }
            } else {
                let mut token = String::new();
                let mut more = false;
                for c in chars.by_ref() {
                    if c == ',' {
                        more = true;
                        break;
                    }
                    token.push(c);
                }
                values.push(Arg::Bare(token.trim().to_string()));
                if !more {
                    break;
                }
            }
        }

        if values.len() != expected {
            return Err(Self::error(
                kind,
                line,
                format!("expected {} arguments, found {}", expected, values.len()),
            ));
        }
        Ok(Self { kind, line, values })
    }

    fn text(&self, index: usize) -> Result<String, RecordError> {
        match &self.values[index] {
            Arg::Quoted(text) => Ok(text.clone()),
            Arg::Bare(token) => Err(Self::error(
                self.kind,
                self.line,
                format!("argument {} ('{}') must be quoted", index + 1, token),
            )),
        }
    }

    fn int(&self, index: usize) -> Result<i64, RecordError> {
        match &self.values[index] {
            Arg::Bare(token) => token.parse().map_err(|_| {
                Self::error(
                    self.kind,
                    self.line,
                    format!("argument {} ('{}') is not an integer", index + 1, token),
                )
            }),
            Arg::Quoted(text) => Err(Self::error(
                self.kind,
                self.line,
                format!("argument {} ('{}') must be an integer", index + 1, text),
            )),
        }
    }

    fn error(kind: &'static str, line: &str, reason: String) -> RecordError {
        RecordError::Malformed {
            kind,
            line: line.to_string(),
            reason,
        }
    }
}
