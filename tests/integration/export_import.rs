//! Export from the play save and import into the import save

use std::fs;

use super::common::*;
use schem::core::services::{PuzzleService, ServiceError, SolutionService, UserService};
use schem::puzzle::{self, PuzzleDocument};

fn fixture_with_play_save() -> TournamentFixture {
    let fixture = TournamentFixture::new();
    UserService::add_users(&fixture.core, &[PLAY_SAVE]).unwrap();
    fixture
}

#[test]
fn test_export_then_import_reproduces_solution() {
    let fixture = fixture_with_play_save();
    fixture.add_solution(PLAY_SAVE, "custom-1", "Alpha", &reactor_solution(), (50, 1, 2));

    let summary = SolutionService::export(&fixture.core, ROUND, "*-*-*").unwrap();
    assert_eq!(summary.path, fixture.round_dir().join("exported000.txt"));
    assert_eq!(summary.solutions, 1);

    let exported = fs::read_to_string(&summary.path).unwrap();
    assert!(exported.starts_with("SOLUTION:Alpha,Alice,50-1-2\n"));

    fs::copy(&summary.path, fixture.round_dir().join("solutions.txt")).unwrap();
    assert_eq!(SolutionService::import(&fixture.core, ROUND).unwrap(), 1);

    let save = fixture.open_save(IMPORT_SAVE);
    let attempts = save.levels.attempts().unwrap();
    assert_eq!(attempts.len(), 1);
    // The solver becomes the author so the game lists who solved it.
    let document = PuzzleDocument::parse(&puzzle::decode(&attempts[0].definition).unwrap()).unwrap();
    assert_eq!(document.author(), Some("Alice"));
    assert_eq!(document.field("name").and_then(|v| v.as_str()), Some("Alpha"));

    let imported = save.solutions.read_solution(&attempts[0].id, false).unwrap();
    assert_eq!(imported.components, reactor_solution());
}

#[test]
fn test_export_applies_filter() {
    let fixture = fixture_with_play_save();
    fixture.add_solution(PLAY_SAVE, "custom-1", "Alpha", &reactor_solution(), (50, 1, 2));
    fixture.add_solution(PLAY_SAVE, "custom-2", "Alpha", &reactor_solution(), (80, 1, 2));

    let summary = SolutionService::export(&fixture.core, ROUND, "80-*-*").unwrap();
    assert_eq!(summary.solutions, 1);
    let exported = fs::read_to_string(&summary.path).unwrap();
    assert!(exported.contains("80-1-2"));
    assert!(!exported.contains("50-1-2"));

    let summary = SolutionService::export(&fixture.core, ROUND, "*-2-*").unwrap();
    assert_eq!(summary.path, fixture.round_dir().join("exported001.txt"));
    assert_eq!(summary.solutions, 0);
}

#[test]
fn test_edited_solution_is_only_exported_as_incomplete() {
    let fixture = fixture_with_play_save();
    // Recorded with three symbols, but the stored solution has two.
    fixture.add_solution(PLAY_SAVE, "custom-1", "Beta", &reactor_solution(), (50, 1, 3));

    let summary = SolutionService::export(&fixture.core, "Beta", "*-*-*").unwrap();
    assert_eq!(summary.path, fixture.round_dir().join("exported_Beta000.txt"));
    assert_eq!(summary.solutions, 0);

    let summary = SolutionService::export(&fixture.core, "Beta", "incomplete-*-2").unwrap();
    assert_eq!(summary.path, fixture.round_dir().join("exported_Beta001.txt"));
    let exported = fs::read_to_string(&summary.path).unwrap();
    assert!(exported.starts_with("SOLUTION:Beta,Alice,Incomplete-1-2\n"));
}

#[test]
fn test_solutions_to_other_puzzles_are_not_exported() {
    let fixture = fixture_with_play_save();
    fixture.add_solution(PLAY_SAVE, "custom-1", "Alpha", &reactor_solution(), (50, 1, 2));

    let summary = SolutionService::export(&fixture.core, "Beta", "*-*-*").unwrap();
    assert_eq!(summary.solutions, 0);
    assert_eq!(fs::read_to_string(&summary.path).unwrap(), "");
}

#[test]
fn test_invalid_filter_is_rejected() {
    let fixture = fixture_with_play_save();
    assert!(matches!(
        SolutionService::export(&fixture.core, ROUND, "50-1"),
        Err(ServiceError::Filter(_))
    ));
}

#[test]
fn test_bad_solutions_file_imports_nothing() {
    let fixture = TournamentFixture::new();
    fs::write(
        fixture.round_dir().join("solutions.txt"),
        "SOLUTION:Alpha,Bob,50-1-2\n\
         COMPONENT:'drag-arbitrary-input',0,1,''\n\
         MEMBER:'instr-grab',not-a-number\n",
    )
    .unwrap();

    assert!(SolutionService::import(&fixture.core, ROUND).is_err());
    let save = fixture.open_save(IMPORT_SAVE);
    assert_eq!(save.levels.count().unwrap(), 0);
}

#[test]
fn test_import_unknown_round() {
    let fixture = TournamentFixture::new();
    assert!(matches!(
        SolutionService::import(&fixture.core, "round9"),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn test_play_adds_round_puzzles() {
    let fixture = TournamentFixture::new();
    assert_eq!(PuzzleService::play(&fixture.core, ROUND).unwrap(), 2);

    let save = fixture.open_save(PLAY_SAVE);
    assert_eq!(save.levels.count().unwrap(), 2);
    // Nothing has been played yet.
    assert!(save.levels.attempts().unwrap().is_empty());
}
