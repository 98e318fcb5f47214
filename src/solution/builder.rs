//! Assembles a solution from store rows

use super::filter::LiveCounts;
use super::record::{
    Annotation, Component, ComponentBlock, Member, Pipe, RecordError, SolutionHeader,
    SolutionRecord,
};

/// Collects component rows and their children in the order the store hands
/// them over, counting reactors and symbols on the way.
#[derive(Debug, Default)]
pub struct SolutionRecordBuilder {
    swap_waldos: bool,
    components: Vec<ComponentBlock>,
    counts: LiveCounts,
}

/// Body of a solution plus the counts observed while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltSolution {
    pub components: Vec<ComponentBlock>,
    pub counts: LiveCounts,
}

impl SolutionRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchange the red and blue waldo of every member as it is added.
    pub fn swap_waldos(mut self, swap: bool) -> Self {
        self.swap_waldos = swap;
        self
    }

    pub fn push_component(&mut self, component: Component) {
        if component.is_reactor() {
            self.counts.reactors += 1;
        }
        self.components.push(ComponentBlock::new(component));
    }

    pub fn push_member(&mut self, member: Member) -> Result<(), RecordError> {
        if member.is_symbol() {
            self.counts.symbols += 1;
        }
        let member = if self.swap_waldos {
            member.with_swapped_waldo()
        } else {
            member
        };
        self.current("MEMBER")?.members.push(member);
        Ok(())
    }

    pub fn push_pipe(&mut self, pipe: Pipe) -> Result<(), RecordError> {
        self.current("PIPE")?.pipes.push(pipe);
        Ok(())
    }

    pub fn push_annotation(&mut self, annotation: Annotation) -> Result<(), RecordError> {
        self.current("ANNOTATION")?.annotations.push(annotation);
        Ok(())
    }

    pub fn finish(self) -> BuiltSolution {
        BuiltSolution {
            components: self.components,
            counts: self.counts,
        }
    }

    fn current(&mut self, kind: &str) -> Result<&mut ComponentBlock, RecordError> {
        self.components
            .last_mut()
            .ok_or_else(|| RecordError::Orphan(kind.to_string(), "COMPONENT"))
    }
}

impl BuiltSolution {
    pub fn into_record(self, header: SolutionHeader) -> SolutionRecord {
        SolutionRecord {
            header,
            components: self.components,
        }
    }
}
