use std::fs;
use std::path::{Path, PathBuf};

use crate::core::services::error::ServiceError;
use crate::core::services::user_service::UserService;
use crate::core::{SaveFile, ToolCore};
use crate::data::{ImportContext, LevelIds};
use crate::puzzle::{self, PuzzleDocument, PuzzleFile};
use crate::solution::{
    parse_records, ExtendedStats, Selection, SolutionHeader, SolutionRecord, StatsFilter,
};

/// Solver name on solutions read for `copy`.
const COPY_SOLVER: &str = "Copying";
/// Solver name on solutions read for `stats`.
const STATS_SOLVER: &str = "Stats";

#[derive(Debug, Clone)]
pub struct ReadOptions<'a> {
    pub solver: &'a str,
    pub swap_waldos: bool,
    /// Print instruction counts and waldopath for each selected solution
    pub extended_stats: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub solutions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// Zero or several solutions matched, so nothing was written.
    NotCopied(usize),
}

pub struct SolutionService;

impl SolutionService {
    /// Solutions in `save` to the puzzle with the given definition, selected
    /// by `filter`.
    pub fn read_solutions(
        save: &SaveFile,
        puzzle: &str,
        definition: &str,
        filter: &StatsFilter,
        options: &ReadOptions<'_>,
    ) -> Result<Vec<SolutionRecord>, ServiceError> {
        let identity = PuzzleDocument::identity_of(definition)?;
        let mut found = Vec::new();

        for attempt in save.levels.attempts()? {
            match PuzzleDocument::identity_of(&attempt.definition) {
                Ok(other) if other == identity => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(level_id = %attempt.id, error = %e, "Skipping level with unreadable definition");
                    continue;
                }
            }

            let built = save
                .solutions
                .read_solution(&attempt.id, options.swap_waldos)?;
            let stats = attempt.stats.label(&built.counts);

            match filter.select(&attempt.stats, &built.counts) {
                Selection::Selected => {
                    println!("    Exporting {}", stats);
                    if options.extended_stats {
                        println!("{}", ExtendedStats::of(&built.components)?);
                    }
                    tracing::debug!(puzzle = %puzzle, level_id = %attempt.id, stats = %stats, "Selected solution");
                    found.push(built.into_record(SolutionHeader {
                        puzzle: puzzle.to_string(),
                        solver: options.solver.to_string(),
                        stats,
                    }));
                }
                Selection::Skipped => println!("    Skipping {}", stats),
                Selection::SkippedStale => println!(
                    "    Skipping {} (last completion stats {}-{}-{})",
                    stats, attempt.stats.cycles, attempt.stats.reactors, attempt.stats.symbols
                ),
            }
        }

        Ok(found)
    }

    /// Export the play save's solutions for a round (every puzzle in it) or
    /// a single puzzle to the next free `exported*.txt` of the round.
    pub fn export(
        core: &ToolCore,
        puzzle_or_round: &str,
        filter: &str,
    ) -> Result<ExportSummary, ServiceError> {
        let config = core.config();
        let tournament = core.tournament();
        let save_path = core.save_file_path(&config.play_save);
        println!(
            "Extracting solutions from {} for puzzle or round {} in {} with filter {}",
            save_path.display(),
            puzzle_or_round,
            tournament.root().display(),
            filter
        );
        let filter: StatsFilter = filter.parse()?;

        let (puzzles, path) = if tournament.is_round(puzzle_or_round) {
            let round_dir = tournament.round_dir(puzzle_or_round);
            let path = tournament.next_export_path(&round_dir, None);
            (tournament.puzzles_in(&round_dir)?, path)
        } else {
            let round_dir = tournament.puzzle_round_dir(puzzle_or_round)?;
            let path = tournament.next_export_path(&round_dir, Some(puzzle_or_round));
            (vec![tournament.puzzle(&round_dir, puzzle_or_round)], path)
        };

        let save = core.open_save(&config.play_save)?;
        println!("Exporting to {}", path.display());

        let options = ReadOptions {
            solver: &config.user,
            swap_waldos: false,
            extended_stats: false,
        };
        let mut text = String::new();
        let mut solutions = 0;
        for puzzle in &puzzles {
            println!("  Searching for solutions to '{}'", puzzle.name);
            let definition = puzzle.read_definition()?;
            for record in Self::read_solutions(&save, &puzzle.name, &definition, &filter, &options)? {
                text.push_str(&record.to_text());
                solutions += 1;
            }
        }

        fs::write(&path, text).map_err(ServiceError::io(&path))?;
        tracing::info!(path = %path.display(), solutions, "Exported solutions");
        Ok(ExportSummary { path, solutions })
    }

    /// Import `<round>/solutions.txt` into the import save. The whole file
    /// is parsed before anything is written.
    pub fn import(core: &ToolCore, round: &str) -> Result<usize, ServiceError> {
        let config = core.config();
        let tournament = core.tournament();
        UserService::add_users(core, &[config.import_save.as_str()])?;

        if !tournament.is_round(round) {
            return Err(ServiceError::NotFound(format!("Round {} not found", round)));
        }
        let round_dir = tournament.round_dir(round);
        let save = core.open_save(&config.import_save)?;
        println!(
            "Importing solutions for puzzles in {} to {}",
            round_dir.display(),
            save.database.path.display()
        );

        let solutions_path = tournament.solutions_path(round);
        let text = fs::read_to_string(&solutions_path).map_err(ServiceError::io(&solutions_path))?;
        let records = parse_records(&text)?;

        Self::write_solutions(core, &save, &round_dir, &records, true)
    }

    /// Copy the single play-save solution selected by `filter` into a new
    /// level, optionally with the waldos swapped.
    pub fn copy(
        core: &ToolCore,
        puzzle: &str,
        filter: &str,
        swap_waldos: bool,
    ) -> Result<CopyOutcome, ServiceError> {
        println!("Copying solution for puzzle {} with filter {}", puzzle, filter);
        let filter: StatsFilter = filter.parse()?;
        let tournament = core.tournament();
        let round_dir = tournament.puzzle_round_dir(puzzle)?;
        let definition = tournament.puzzle(&round_dir, puzzle).read_definition()?;
        let save = core.open_save(&core.config().play_save)?;

        let options = ReadOptions {
            solver: COPY_SOLVER,
            swap_waldos,
            extended_stats: false,
        };
        let found = Self::read_solutions(&save, puzzle, &definition, &filter, &options)?;
        if found.len() != 1 {
            println!("Puzzle not copied - {} solutions found", found.len());
            return Ok(CopyOutcome::NotCopied(found.len()));
        }

        Self::write_solutions(core, &save, &round_dir, &found, false)?;
        Ok(CopyOutcome::Copied)
    }

    /// Print extended statistics of the play-save solutions to a puzzle.
    pub fn stats(
        core: &ToolCore,
        puzzle: &str,
        filter: &str,
    ) -> Result<Vec<SolutionRecord>, ServiceError> {
        println!(
            "Calculating extended stats of solution(s) for puzzle {} with filter {}",
            puzzle, filter
        );
        let filter: StatsFilter = filter.parse()?;
        let tournament = core.tournament();
        let round_dir = tournament.puzzle_round_dir(puzzle)?;
        let definition = tournament.puzzle(&round_dir, puzzle).read_definition()?;
        let save = core.open_save(&core.config().play_save)?;

        let options = ReadOptions {
            solver: STATS_SOLVER,
            swap_waldos: false,
            extended_stats: true,
        };
        Self::read_solutions(&save, puzzle, &definition, &filter, &options)
    }

    /// Write each record as a new level, one transaction per record.
    ///
    /// With `set_solver` the puzzle author becomes the record's solver.
    fn write_solutions(
        core: &ToolCore,
        save: &SaveFile,
        round_dir: &Path,
        records: &[SolutionRecord],
        set_solver: bool,
    ) -> Result<usize, ServiceError> {
        let mut level_ids = LevelIds::starting_now();

        for record in records {
            let header = &record.header;
            let puzzle_file: PuzzleFile = core.tournament().puzzle(round_dir, &header.puzzle);
            let original = puzzle_file.read_definition()?;
            let definition = if set_solver {
                puzzle::replace_author(&original, &header.solver)?
            } else {
                original.trim().to_string()
            };

            println!(
                "  Importing solution to {} by {} ({})",
                header.puzzle, header.solver, header.stats
            );
            let context = ImportContext {
                level_id: level_ids.next_id(),
                definition,
            };
            save.solutions.write_solution(&context, &record.components)?;
            tracing::info!(
                puzzle = %header.puzzle,
                solver = %header.solver,
                level_id = %context.level_id,
                "Imported solution"
            );
        }

        Ok(records.len())
    }
}
