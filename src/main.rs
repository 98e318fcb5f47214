use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use schem::core::services::{
    CopyOutcome, DiagnoseService, ImageService, PuzzleService, SolutionService, UserService,
};
use schem::core::ToolCore;
use schem::{util, Config};

const ANY_FILTER: &str = "*-*-*";

/// Tournament tool for SpaceChem save files
#[derive(Parser, Debug)]
#[command(name = "schem")]
#[command(author, version, about = "Export, import and analyse SpaceChem tournament solutions", long_about = None)]
struct Args {
    /// Tournament directory holding config.toml and the round folders
    #[arg(short = 'd', long = "dir")]
    dir: Option<PathBuf>,

    /// Directory for the tool's own logs (default ~/.schem)
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add the puzzles of a round to the play save
    Play { round: String },
    /// Export solutions for a round or a single puzzle
    Export {
        /// Round directory or puzzle name
        target: String,
        /// cycles-reactors-symbols, each a number or '*'; cycles may be INCOMPLETE
        #[arg(default_value = ANY_FILTER)]
        filter: String,
    },
    /// Import <round>/solutions.txt into the import save
    Import { round: String },
    /// Copy one solution within the play save
    Copy {
        puzzle: String,
        #[arg(default_value = ANY_FILTER)]
        filter: String,
    },
    /// Copy one solution within the play save with the waldos swapped
    #[command(name = "copyswapped")]
    CopySwapped {
        puzzle: String,
        #[arg(default_value = ANY_FILTER)]
        filter: String,
    },
    /// Print instruction counts and waldopath of matching solutions
    Stats {
        puzzle: String,
        #[arg(default_value = ANY_FILTER)]
        filter: String,
    },
    /// Add the play and import users to the game
    #[command(name = "addusers")]
    AddUsers,
    /// Remove the play and import users from the game
    #[command(name = "removeusers")]
    RemoveUsers,
    /// Patch reactor textures for a puzzle, or restore them without one
    Images { puzzle: Option<String> },
    /// Check the game files the tool relies on
    Diagnose,
}

fn main() -> Result<()> {
    let args = Args::parse();
    util::init_data_dir(args.data_dir.clone());

    // Initialize logging to file (~/.schem/logs/schem.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    println!("schem {}", env!("CARGO_PKG_VERSION"));
    let working_dir = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine working directory")?,
    };
    let config = Config::load(&working_dir)?;
    let core = ToolCore::new(config);

    let result = run(&core, args.command);
    if let Err(e) = &result {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
    }
    result
}

fn run(core: &ToolCore, command: Command) -> Result<()> {
    let config = core.config();
    let users = [config.play_save.as_str(), config.import_save.as_str()];
    match command {
        Command::Play { round } => {
            PuzzleService::play(core, &round)
                .with_context(|| format!("Failed to add puzzles from round {}", round))?;
        }
        Command::Export { target, filter } => {
            let summary = SolutionService::export(core, &target, &filter)
                .with_context(|| format!("Failed to export {}", target))?;
            println!(
                "Exported {} solution(s) to {}",
                summary.solutions,
                summary.path.display()
            );
        }
        Command::Import { round } => {
            let imported = SolutionService::import(core, &round)
                .with_context(|| format!("Failed to import solutions for round {}", round))?;
            println!("Imported {} solution(s)", imported);
        }
        Command::Copy { puzzle, filter } => copy(core, &puzzle, &filter, false)?,
        Command::CopySwapped { puzzle, filter } => copy(core, &puzzle, &filter, true)?,
        Command::Stats { puzzle, filter } => {
            SolutionService::stats(core, &puzzle, &filter)
                .with_context(|| format!("Failed to calculate stats for {}", puzzle))?;
        }
        Command::AddUsers => {
            UserService::add_users(core, &users)?;
        }
        Command::RemoveUsers => {
            UserService::remove_users(core, &users)?;
        }
        Command::Images { puzzle: None } => {
            ImageService::restore(core)?;
        }
        Command::Images {
            puzzle: Some(puzzle),
        } => {
            ImageService::apply(core, &puzzle)
                .with_context(|| format!("Failed to patch images for {}", puzzle))?;
        }
        Command::Diagnose => {
            let report = DiagnoseService::run(core)?;
            if report.problems() > 0 {
                println!("{} problem(s) found", report.problems());
            }
        }
    }
    Ok(())
}

fn copy(core: &ToolCore, puzzle: &str, filter: &str, swap_waldos: bool) -> Result<()> {
    let outcome = SolutionService::copy(core, puzzle, filter, swap_waldos)
        .with_context(|| format!("Failed to copy {}", puzzle))?;
    if outcome == CopyOutcome::Copied {
        println!("Copied solution to {}", puzzle);
    }
    Ok(())
}
