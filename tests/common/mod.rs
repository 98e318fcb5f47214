//! Shared test utilities for the schem integration tests
//!
//! - `TournamentFixture`: a tournament folder and a game save directory in a
//!   temp dir, with `.locals` and the `new.user` template in place
//! - `reactor_solution`: a small solution to write into a save

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use schem::config::Config;
use schem::core::{SaveFile, ToolCore};
use schem::data::{Database, ImportContext};
use schem::puzzle;
use schem::solution::{Annotation, Component, ComponentBlock, Layer, Member, Pipe};
use tempfile::TempDir;

pub const ROUND: &str = "round1";
pub const PLAY_SAVE: &str = "Play";
pub const IMPORT_SAVE: &str = "Import";

/// JSON text of a puzzle as the game stores it.
pub fn puzzle_json(name: &str, author: &str, input_count: u32) -> String {
    format!(
        r#"{{"name":"{}","author":"{}","input-zones":{{"alpha":{{"inputs":[{{"molecule":"H~01","count":{}}}]}}}},"output-zones":{{"psi":{{"molecule":"H2","count":10}}}}}}"#,
        name, author, input_count
    )
}

pub fn encoded_puzzle(name: &str, author: &str) -> String {
    puzzle::encode(&puzzle_json(name, author, 12)).unwrap()
}

pub struct TournamentFixture {
    pub dir: TempDir,
    pub core: ToolCore,
}

impl TournamentFixture {
    /// A tournament with `round1/Alpha.puzzle` and `round1/Beta.puzzle`.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(ROUND)).unwrap();
        for name in ["Alpha", "Beta"] {
            fs::write(
                root.join(ROUND).join(format!("{}.puzzle", name)),
                format!("{}\r\n", encoded_puzzle(name, "Organiser")),
            )
            .unwrap();
        }

        let config = Config {
            user: "Alice".into(),
            play_save: PLAY_SAVE.into(),
            import_save: IMPORT_SAVE.into(),
            save_path: root.join("game"),
            image_path: root.join("images"),
            working_dir: root.to_path_buf(),
        };
        let core = ToolCore::new(config);
        fs::create_dir_all(core.save_dir()).unwrap();
        Database::create_locals(core.locals_path()).unwrap();
        Database::create(core.save_template_path()).unwrap();

        Self { dir, core }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn round_dir(&self) -> std::path::PathBuf {
        self.root().join(ROUND)
    }

    pub fn open_save(&self, user: &str) -> SaveFile {
        self.core.open_save(user).unwrap()
    }

    /// Store a solution for `puzzle` as if the game had run it with the
    /// given stats.
    pub fn add_solution(
        &self,
        user: &str,
        level_id: &str,
        puzzle: &str,
        blocks: &[ComponentBlock],
        (cycles, reactors, symbols): (i64, i64, i64),
    ) {
        let save = self.open_save(user);
        let context = ImportContext {
            level_id: level_id.into(),
            definition: encoded_puzzle(puzzle, "Someone"),
        };
        save.solutions.write_solution(&context, blocks).unwrap();
        save.database
            .with_connection(|conn| {
                conn.execute(
                    "UPDATE Level SET passed = 1, cycles = ?2, reactors = ?3, symbols = ?4 WHERE id = ?1",
                    rusqlite::params![level_id, cycles, reactors, symbols],
                )
            })
            .unwrap();
    }
}

fn member(kind: &str, layer: i64, x: i64, y: i64, arrow_dir: i64) -> Member {
    Member {
        kind: kind.into(),
        arrow_dir,
        choice: 0,
        layer: Layer::new(layer),
        x,
        y,
        element_type: 0,
        element: 0,
    }
}

/// An input, and a reactor with two instructions per waldo. Live counts are
/// one reactor and two symbols.
pub fn reactor_solution() -> Vec<ComponentBlock> {
    let input = ComponentBlock::new(Component {
        kind: "drag-arbitrary-input".into(),
        x: 0,
        y: 1,
        name: String::new(),
    });

    let mut reactor = ComponentBlock::new(Component {
        kind: "drag-research-reactor".into(),
        x: 2,
        y: 3,
        name: "Main".into(),
    });
    reactor.members = vec![
        member("instr-start", 32, 0, 0, 0),
        member("instr-grab", 32, 1, 0, 0),
        member("instr-start", 128, 0, 7, 0),
        member("instr-arrow", 64, 3, 7, 270),
    ];
    reactor.pipes.push(Pipe {
        output_id: 0,
        x: 4,
        y: 1,
    });
    reactor.annotations.push(Annotation {
        output_id: 0,
        expanded: true,
        x: 1,
        y: 1,
        text: "grab first".into(),
    });

    vec![input, reactor]
}
