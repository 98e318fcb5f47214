//! Waldo path coverage
//!
//! Walks every path a waldo could take through a reactor and counts the
//! cells it can reach. Switches (sensors and flip-flops) are explored both
//! ways, so the result is the reachable set under any outcome rather than
//! one concrete run.

use thiserror::Error;

use super::layer::{Layer, Waldo};
use super::record::{ComponentBlock, Member};

pub const WIDTH: usize = 10;
pub const HEIGHT: usize = 8;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WaldoPathError {
    #[error("{kind} at ({x}, {y}) is outside the {w}x{h} reactor grid", w = WIDTH, h = HEIGHT)]
    OutOfGrid { kind: String, x: i64, y: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Right,
    Down,
    Left,
    Up,
}

impl Heading {
    /// Arrow directions are stored in degrees: 0 right, 90 down, 180 left,
    /// -90 up. Anything else reads as right.
    pub fn from_degrees(degrees: i64) -> Self {
        match degrees {
            90 => Heading::Down,
            180 => Heading::Left,
            -90 => Heading::Up,
            _ => Heading::Right,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// One cell forward. Walking into an edge leaves the waldo in place.
    fn step(self, x: usize, y: usize) -> (usize, usize) {
        match self {
            Heading::Right if x < WIDTH - 1 => (x + 1, y),
            Heading::Down if y < HEIGHT - 1 => (x, y + 1),
            Heading::Left if x > 0 => (x - 1, y),
            Heading::Up if y > 0 => (x, y - 1),
            _ => (x, y),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    x: usize,
    y: usize,
    heading: Heading,
}

type Grid<T> = [[T; WIDTH]; HEIGHT];

/// Cells covered by any waldo of one reactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    cells: Grid<bool>,
}

impl Coverage {
    fn new() -> Self {
        Self {
            cells: [[false; WIDTH]; HEIGHT],
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.cells[y][x]
    }

    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }
}

/// Arrow and switch headings for one waldo, plus its start positions.
struct WaldoProgram {
    arrows: Grid<Option<Heading>>,
    switches: Grid<Option<Heading>>,
    starts: Vec<Cursor>,
}

impl WaldoProgram {
    /// `None` when no arrow or instruction uses the waldo; an unused waldo
    /// still has a start symbol but never moves.
    fn load(members: &[Member], waldo: Waldo) -> Result<Option<Self>, WaldoPathError> {
        let arrow_layer = Layer::arrows(waldo);
        let instruction_layer = Layer::instructions(waldo);

        let used = members.iter().any(|m| {
            m.is_instruction()
                && !m.is_start()
                && (m.layer == arrow_layer || m.layer == instruction_layer)
        });
        if !used {
            return Ok(None);
        }

        let mut program = Self {
            arrows: [[None; WIDTH]; HEIGHT],
            switches: [[None; WIDTH]; HEIGHT],
            starts: Vec::new(),
        };
        for member in members {
            let heading = Heading::from_degrees(member.arrow_dir);
            if member.layer == arrow_layer && member.is_arrow() {
                let (x, y) = cell(member)?;
                program.arrows[y][x] = Some(heading);
            } else if member.layer == instruction_layer {
                if member.is_switch() {
                    let (x, y) = cell(member)?;
                    program.switches[y][x] = Some(heading);
                } else if member.is_start() {
                    let (x, y) = cell(member)?;
                    program.starts.push(Cursor { x, y, heading });
                }
            }
        }
        Ok(Some(program))
    }

    /// Explore every path from the starts, marking covered cells.
    ///
    /// A path ends once it re-enters a cell with a heading it already had
    /// there, which also terminates loops.
    fn trace(&self, coverage: &mut Coverage) {
        let mut visited = [[[false; WIDTH]; HEIGHT]; 4];
        let mut pending = self.starts.clone();

        while let Some(Cursor {
            mut x,
            mut y,
            mut heading,
        }) = pending.pop()
        {
            while !visited[heading.index()][y][x] {
                coverage.cells[y][x] = true;
                visited[heading.index()][y][x] = true;

                let arrow = self.arrows[y][x];
                let switch = self.switches[y][x];

                match (switch, arrow) {
                    // A switch pointing straight ahead over a turning arrow:
                    // the waldo either carries on or follows the arrow.
                    (Some(s), Some(a)) if s == heading && a != heading => {
                        pending.push(Cursor { x, y, heading: a });
                    }
                    _ => {
                        if let Some(s) = switch {
                            if s != heading && Some(s) != arrow {
                                pending.push(Cursor { x, y, heading: s });
                            }
                        }
                        if let Some(a) = arrow {
                            if a != heading {
                                heading = a;
                                continue;
                            }
                        }
                    }
                }

                (x, y) = heading.step(x, y);
            }
        }
    }
}

fn cell(member: &Member) -> Result<(usize, usize), WaldoPathError> {
    let in_grid = (0..WIDTH as i64).contains(&member.x) && (0..HEIGHT as i64).contains(&member.y);
    if !in_grid {
        return Err(WaldoPathError::OutOfGrid {
            kind: member.kind.clone(),
            x: member.x,
            y: member.y,
        });
    }
    Ok((member.x as usize, member.y as usize))
}

/// Cells reachable by either waldo of a single reactor.
pub fn reactor_coverage(members: &[Member]) -> Result<Coverage, WaldoPathError> {
    let mut coverage = Coverage::new();
    for waldo in Waldo::ALL {
        if let Some(program) = WaldoProgram::load(members, waldo)? {
            program.trace(&mut coverage);
        }
    }
    Ok(coverage)
}

/// Waldopath statistic of a whole solution: covered cells summed over all
/// components.
pub fn waldo_path(components: &[ComponentBlock]) -> Result<usize, WaldoPathError> {
    let mut total = 0;
    for block in components {
        total += reactor_coverage(&block.members)?.count();
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instr(kind: &str, degrees: i64, layer: i64, x: i64, y: i64) -> Member {
        Member {
            kind: format!("instr-{}", kind),
            arrow_dir: degrees,
            choice: 0,
            layer: Layer::new(layer),
            x,
            y,
            element_type: 0,
            element: 0,
        }
    }

    #[test]
    fn test_start_then_arrow_down() {
        let members = vec![instr("start", 0, 32, 0, 0), instr("arrow", 90, 16, 5, 0)];
        let coverage = reactor_coverage(&members).unwrap();

        for x in 0..=5 {
            assert!(coverage.contains(x, 0), "({}, 0) not covered", x);
        }
        for y in 0..HEIGHT {
            assert!(coverage.contains(5, y), "(5, {}) not covered", y);
        }
        assert!(!coverage.contains(6, 0));
        assert_eq!(coverage.count(), 13);
    }

    #[test]
    fn test_unused_waldo_contributes_nothing() {
        // Both starts are present but only red has an instruction.
        let members = vec![
            instr("start", 0, 32, 0, 0),
            instr("start", 0, 128, 0, 7),
            instr("arrow", 90, 16, 3, 0),
        ];
        let coverage = reactor_coverage(&members).unwrap();
        assert!(!coverage.contains(0, 7));
        assert_eq!(coverage.count(), 4 + 7);
    }

    #[test]
    fn test_start_alone_does_not_move() {
        let members = vec![instr("start", 0, 32, 0, 0)];
        assert_eq!(reactor_coverage(&members).unwrap().count(), 0);
    }

    #[test]
    fn test_loop_terminates() {
        let members = vec![
            instr("start", 0, 32, 1, 1),
            instr("arrow", 90, 16, 3, 1),
            instr("arrow", 180, 16, 3, 3),
            instr("arrow", -90, 16, 1, 3),
            instr("arrow", 0, 16, 1, 1),
        ];
        // Perimeter of the 3x3 square from (1,1) to (3,3).
        assert_eq!(reactor_coverage(&members).unwrap().count(), 8);
    }

    #[test]
    fn test_switch_explores_both_branches() {
        let members = vec![
            instr("start", 0, 32, 0, 2),
            instr("sensor", -90, 32, 4, 2),
        ];
        let coverage = reactor_coverage(&members).unwrap();
        // Straight on to the right edge...
        assert!(coverage.contains(9, 2));
        // ...and up from the sensor.
        assert!(coverage.contains(4, 0));
        assert_eq!(coverage.count(), 10 + 2);
    }

    #[test]
    fn test_switch_over_turning_arrow_keeps_going() {
        // The flip-flop points ahead, the arrow turns down.
        let members = vec![
            instr("start", 0, 32, 0, 0),
            instr("toggle", 0, 32, 2, 0),
            instr("arrow", 90, 16, 2, 0),
        ];
        let coverage = reactor_coverage(&members).unwrap();
        assert!(coverage.contains(9, 0));
        assert!(coverage.contains(2, 7));
        assert_eq!(coverage.count(), 10 + 7);
    }

    #[test]
    fn test_waldos_share_cells() {
        let members = vec![
            instr("start", 0, 32, 0, 0),
            instr("arrow", 0, 16, 0, 0),
            instr("start", 0, 128, 0, 0),
            instr("arrow", 0, 64, 0, 0),
        ];
        assert_eq!(reactor_coverage(&members).unwrap().count(), WIDTH);
    }

    #[test]
    fn test_other_lanes_are_ignored() {
        // Layer 17 is not the red arrow layer.
        let members = vec![
            instr("start", 0, 32, 0, 0),
            instr("grab", 0, 32, 9, 7),
            instr("arrow", 90, 17, 5, 0),
        ];
        assert_eq!(reactor_coverage(&members).unwrap().count(), WIDTH);
    }

    #[test]
    fn test_unreachable_instruction_does_not_shrink_coverage() {
        let mut members = vec![instr("start", 0, 32, 0, 0), instr("arrow", 90, 16, 5, 0)];
        let before = reactor_coverage(&members).unwrap();
        members.push(instr("arrow", 180, 16, 8, 6));
        let after = reactor_coverage(&members).unwrap();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if before.contains(x, y) {
                    assert!(after.contains(x, y));
                }
            }
        }
        assert!(after.count() >= before.count());
    }

    #[test]
    fn test_out_of_grid_member() {
        let members = vec![instr("start", 0, 32, 0, 0), instr("arrow", 90, 16, 10, 0)];
        assert!(matches!(
            reactor_coverage(&members),
            Err(WaldoPathError::OutOfGrid { x: 10, .. })
        ));
    }

    #[test]
    fn test_waldo_path_sums_reactors() {
        use crate::solution::record::Component;

        let reactor = |members: Vec<Member>| ComponentBlock {
            component: Component {
                kind: "drag-research-reactor".into(),
                x: 0,
                y: 0,
                name: String::new(),
            },
            members,
            pipes: Vec::new(),
            annotations: Vec::new(),
        };
        let blocks = vec![
            reactor(vec![instr("start", 0, 32, 0, 0), instr("arrow", 90, 16, 5, 0)]),
            reactor(vec![instr("start", 0, 128, 0, 0), instr("arrow", 0, 64, 0, 0)]),
        ];
        assert_eq!(waldo_path(&blocks).unwrap(), 13 + 10);
    }
}
