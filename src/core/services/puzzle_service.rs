use crate::core::services::error::ServiceError;
use crate::core::services::user_service::UserService;
use crate::core::ToolCore;
use crate::data::LevelIds;

pub struct PuzzleService;

impl PuzzleService {
    /// Add every puzzle of a round to the play save as new custom levels.
    pub fn play(core: &ToolCore, round: &str) -> Result<usize, ServiceError> {
        let config = core.config();
        let tournament = core.tournament();
        UserService::add_users(core, &[config.play_save.as_str()])?;

        if !tournament.is_round(round) {
            return Err(ServiceError::NotFound(format!("Round {} not found", round)));
        }
        let round_dir = tournament.round_dir(round);
        let save = core.open_save(&config.play_save)?;
        println!(
            "Adding puzzles from {} to {}:",
            round_dir.display(),
            save.database.path.display()
        );

        let puzzles = tournament.puzzles_in(&round_dir)?;
        let mut level_ids = LevelIds::starting_now();
        for puzzle in &puzzles {
            if tournament.has_images(&round_dir, &puzzle.name) {
                println!(
                    "  Adding '{}' (reactor images exist for this puzzle)",
                    puzzle.name
                );
            } else {
                println!("  Adding '{}'", puzzle.name);
            }
            let definition = puzzle.read_definition()?;
            let level_id = level_ids.next_id();
            save.levels.add_puzzle(&level_id, definition.trim())?;
            tracing::info!(puzzle = %puzzle.name, level_id = %level_id, "Added puzzle");
        }

        Ok(puzzles.len())
    }
}
